//! model.rs — Typed records shared across the pipeline, repository and API.
//!
//! The storage layer maps rows to these types at its boundary; nothing
//! downstream ever sees loosely-typed tuples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One discovered news item, before or after scoring.
///
/// Created by a provider per scrape, scored once, ranked once, persisted
/// once. Read-only after persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    /// Absolute URL; relative paths are joined against the provider base
    /// before the candidate leaves the ingest layer.
    pub url: String,
    /// Origin tag, fixed per provider (e.g. "Hacker News").
    pub source: String,
    /// Raw popularity indicator from the provider (upvotes etc.), 0 when
    /// the provider carries none.
    pub raw_signal: u32,
    /// Interest score; starts at `raw_signal / 10`, adjusted only by the
    /// scorer, never by downstream stages.
    pub score: f64,
}

impl Candidate {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        raw_signal: u32,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: source.into(),
            raw_signal,
            score: raw_signal as f64 / 10.0,
        }
    }
}

/// The immutable top-N ordered output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSet {
    items: Vec<Candidate>,
}

impl RankedSet {
    pub(crate) fn from_ordered(items: Vec<Candidate>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A new RankedSet holding at most the first `n` items.
    pub fn top(&self, n: usize) -> RankedSet {
        RankedSet {
            items: self.items.iter().take(n).cloned().collect(),
        }
    }
}

/// Lifecycle state of a social post. Transitions move forward only:
/// Pending → Posted or Pending → Failed, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Posted,
    Failed,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Pending => "pending",
            PostStatus::Posted => "posted",
            PostStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(PostStatus::Pending),
            "posted" => Some(PostStatus::Posted),
            "failed" => Some(PostStatus::Failed),
            _ => None,
        }
    }
}

/// A rendered social post and its lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Assigned by the repository on save; 0 for a draft not yet stored.
    pub id: u64,
    /// Rendered text, immutable once created.
    pub content: String,
    /// Target platform (e.g. "linkedin", "instagram").
    pub platform: String,
    pub status: PostStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Set only on the transition to Posted.
    pub posted_at: Option<DateTime<Utc>>,
}

impl PostRecord {
    /// A fresh Pending draft, id assigned by the repository on save.
    pub fn pending(platform: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            content: content.into(),
            platform: platform.into(),
            status: PostStatus::Pending,
            scheduled_for: None,
            created_at: Utc::now(),
            posted_at: None,
        }
    }

    pub fn scheduled_for(mut self, ts: DateTime<Utc>) -> Self {
        self.scheduled_for = Some(ts);
        self
    }
}

/// Process-wide posting cadence. Singleton row, read by the trigger task,
/// updated via the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Lower-case weekday names, e.g. ["monday", "thursday", "saturday"].
    pub days: Vec<String>,
    /// Time of day as "HH:MM", 24h.
    pub time: String,
    pub enabled: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            days: vec!["monday".into(), "thursday".into(), "saturday".into()],
            time: "09:00".into(),
            enabled: true,
        }
    }
}

/// Aggregate counters for the dashboard facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub candidates: usize,
    pub posts_pending: usize,
    pub posts_posted: usize,
    pub posts_failed: usize,
    pub last_scrape_at: Option<DateTime<Utc>>,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Providers produced data; the ranked set was persisted.
    Ranked(RankedSet),
    /// Every provider came back empty. Recognized state, not an error;
    /// persistence and formatting are skipped.
    NoData,
    /// Another run currently holds the process-wide run guard.
    AlreadyRunning,
}
