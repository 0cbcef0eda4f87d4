use once_cell::sync::Lazy;

/// Flat bonus added once per matching keyword.
const KEYWORD_BONUS: f64 = 2.0;

static KEYWORDS: Lazy<Vec<String>> = Lazy::new(|| {
    let raw = include_str!("../config/tech_keywords.json");
    serde_json::from_str::<Vec<String>>(raw).expect("valid tech keyword list")
});

use crate::model::Candidate;

/// Interest scorer. Pure: the score is a function of `(raw_signal, title)`
/// and the fixed keyword set only, so re-scoring the same candidate always
/// yields the same value.
#[derive(Debug, Clone)]
pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Self
    }

    /// Base score is `raw_signal / 10`; each keyword that occurs as a
    /// substring of the lower-cased title adds a flat bonus. The set is
    /// iterated once, so a keyword counts once no matter how often it
    /// repeats in the title, but distinct keywords all accumulate.
    ///
    /// No cap and no rounding, so keyword-dense titles can score
    /// arbitrarily high. Known scoring-quality quirk, kept deliberately.
    pub fn score(&self, candidate: &Candidate) -> f64 {
        let base = candidate.raw_signal as f64 / 10.0;
        let title = candidate.title.to_lowercase();
        let boost = KEYWORDS
            .iter()
            .filter(|kw| title.contains(kw.as_str()))
            .count() as f64
            * KEYWORD_BONUS;
        base + boost
    }

    /// Score every candidate in place. The only stage allowed to touch
    /// `Candidate::score`.
    pub fn score_all(&self, candidates: &mut [Candidate]) {
        for c in candidates.iter_mut() {
            c.score = self.score(c);
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(title: &str, raw: u32) -> Candidate {
        Candidate::new(title, "https://example.com/x", "Test", raw)
    }

    #[test]
    fn base_score_is_signal_over_ten() {
        let s = Scorer::new();
        assert_eq!(s.score(&cand("Random cooking blog post", 80)), 8.0);
        assert_eq!(s.score(&cand("zzz", 0)), 0.0);
    }

    #[test]
    fn each_matching_keyword_adds_flat_bonus() {
        let s = Scorer::new();
        // "ai" (substring of "openai"), "openai", and "launch" all match.
        assert_eq!(s.score(&cand("OpenAI launches new model", 50)), 11.0);
        // "security" and "breach" match independently.
        assert_eq!(s.score(&cand("Major security breach disclosed", 10)), 5.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let s = Scorer::new();
        assert_eq!(
            s.score(&cand("QUANTUM BREAKTHROUGH", 0)),
            s.score(&cand("quantum breakthrough", 0))
        );
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let s = Scorer::new();
        // One keyword ("ai"), no matter how many occurrences.
        assert_eq!(s.score(&cand("ai ai ai ai", 0)), 2.0);
    }

    #[test]
    fn score_is_deterministic() {
        let s = Scorer::new();
        let c = cand("Google quantum breakthrough", 42);
        assert_eq!(s.score(&c), s.score(&c));
    }
}
