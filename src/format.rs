//! format.rs — Renders a ranked set into social post text.
//!
//! The template is fixed and byte-deterministic: identical input and date
//! label always produce identical output, which the round-trip tests rely on.

use crate::model::RankedSet;

/// URLs at or over this many characters are left out of the post body to
/// keep it compact.
const MAX_LINK_CHARS: usize = 100;

const HASHTAGS: &str = "#TechNews #Technology #Innovation #AI #Startups #TechTrends";

#[derive(Debug, Clone)]
pub struct PostFormatter;

impl PostFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the full post. Never fails on a well-formed ranked set;
    /// an empty set still yields the header and hashtag block.
    pub fn render(&self, ranked: &RankedSet, date_label: &str) -> String {
        let mut post = format!("🚀 Top 10 Tech News - {date_label}\n\n");

        for (i, item) in ranked.items().iter().enumerate() {
            let rank = i + 1;
            post.push_str(&format!("{} {}\n", rank_marker(rank), item.title));
            if item.url.chars().count() < MAX_LINK_CHARS {
                post.push_str(&format!("🔗 {}\n", item.url));
            }
            post.push('\n');
        }

        post.push_str(HASHTAGS);
        post
    }
}

impl Default for PostFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Medal emoji for the podium, numbered keycap beyond it.
fn rank_marker(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}️⃣"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Candidate, RankedSet};

    fn ranked(items: Vec<Candidate>) -> RankedSet {
        RankedSet::from_ordered(items)
    }

    #[test]
    fn header_carries_date_label() {
        let out = PostFormatter::new().render(&ranked(vec![]), "January 05, 2026");
        assert!(out.starts_with("🚀 Top 10 Tech News - January 05, 2026\n\n"));
        assert!(out.ends_with(HASHTAGS));
    }

    #[test]
    fn podium_gets_medals_rest_gets_keycaps() {
        let items = (1..=4)
            .map(|i| Candidate::new(format!("t{i}"), "https://e.com", "T", 0))
            .collect();
        let out = PostFormatter::new().render(&ranked(items), "d");
        assert!(out.contains("🥇 t1"));
        assert!(out.contains("🥈 t2"));
        assert!(out.contains("🥉 t3"));
        assert!(out.contains("4️⃣ t4"));
    }

    #[test]
    fn link_line_omitted_at_length_boundary() {
        let short_url = format!("https://e.com/{}", "a".repeat(85)); // 99 chars
        let long_url = format!("https://e.com/{}", "a".repeat(86)); // 100 chars
        assert_eq!(short_url.chars().count(), 99);
        assert_eq!(long_url.chars().count(), 100);

        let items = vec![
            Candidate::new("short", short_url.clone(), "T", 0),
            Candidate::new("long", long_url.clone(), "T", 0),
        ];
        let out = PostFormatter::new().render(&ranked(items), "d");
        assert!(out.contains(&format!("🔗 {short_url}\n")));
        assert!(!out.contains(&long_url));
    }

    #[test]
    fn render_is_byte_deterministic() {
        let items = vec![
            Candidate::new("Quantum leap", "https://e.com/q", "HN", 120),
            Candidate::new("AI funding round", "https://e.com/a", "HN", 90),
        ];
        let f = PostFormatter::new();
        let a = f.render(&ranked(items.clone()), "March 03, 2026");
        let b = f.render(&ranked(items), "March 03, 2026");
        assert_eq!(a, b);
    }
}
