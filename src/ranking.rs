// src/ranking.rs
// Deterministic ordering of scored candidates.

use std::cmp::Ordering;

use crate::model::{Candidate, RankedSet};

/// Default number of items rendered into a post.
pub const PRESENTATION_LIMIT: usize = 10;
/// Default number of items persisted per run.
pub const STORAGE_LIMIT: usize = 50;

/// Orders candidates descending by score and truncates to `limit`.
#[derive(Debug, Clone)]
pub struct Ranker;

impl Ranker {
    pub fn new() -> Self {
        Self
    }

    /// The input slice is never mutated; the result is a new ordered view.
    /// `sort_by` is stable, so candidates with equal scores keep their
    /// relative input order. NaN never occurs (scores come from finite
    /// arithmetic) but compares as equal to stay total.
    pub fn rank(&self, candidates: &[Candidate], limit: usize) -> RankedSet {
        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        sorted.truncate(limit);
        RankedSet::from_ordered(sorted)
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}
