// src/ingest/mod.rs
pub mod config;
pub mod providers;

use anyhow::Result;
use metrics::counter;

use crate::model::Candidate;

/// Raw items considered per provider before scoring, to bound work.
pub const PER_PROVIDER_CAP: usize = 30;

/// An external content source. Implementations must return candidates with
/// absolute URLs and `raw_signal = 0` where the provider carries no
/// popularity figure.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>>;
    fn name(&self) -> &str;
}

/// Fetches every provider and concatenates the results in provider
/// declaration order, so the combined sequence is stable no matter how the
/// fetches complete.
///
/// A failing provider contributes nothing and is logged; it never halts the
/// others. Returns an empty vec only when every provider came back empty.
pub async fn fetch_all(providers: &[Box<dyn SourceProvider>]) -> Vec<Candidate> {
    let mut out = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                v.truncate(PER_PROVIDER_CAP);
                out.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("provider_errors_total").increment(1);
            }
        }
    }
    out
}

/// Joins a possibly-relative href against the provider base URL.
pub(crate) fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_leaves_absolute_urls_alone() {
        assert_eq!(
            absolutize("https://news.ycombinator.com/", "https://example.com/story"),
            "https://example.com/story"
        );
    }

    #[test]
    fn absolutize_joins_relative_paths() {
        assert_eq!(
            absolutize("https://news.ycombinator.com/", "item?id=42"),
            "https://news.ycombinator.com/item?id=42"
        );
        assert_eq!(
            absolutize("https://news.ycombinator.com", "/item?id=42"),
            "https://news.ycombinator.com/item?id=42"
        );
    }
}
