//! Hacker News front-page provider.
//!
//! The front page is plain server-rendered HTML: each story is a
//! `tr.athing` row holding the titleline anchor, followed by a subtext row
//! with the score span. Jobs and ads have no score span; those items keep
//! `raw_signal = 0`.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ingest::{absolutize, SourceProvider, PER_PROVIDER_CAP};
use crate::model::Candidate;

const SOURCE_TAG: &str = "Hacker News";
pub const DEFAULT_BASE_URL: &str = "https://news.ycombinator.com/";

static RE_ATHING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<tr[^>]*class=["']athing[^"']*["'][^>]*>"#).unwrap());
static RE_TITLELINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span class=["']titleline["']>\s*<a href=["']([^"']+)["'][^>]*>(.*?)</a>"#)
        .unwrap()
});
static RE_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<span[^>]*class=["']score["'][^>]*>\s*(\d+)"#).unwrap());
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").unwrap());

pub struct HackerNewsProvider {
    mode: Mode,
    base_url: String,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl HackerNewsProvider {
    /// Parses a captured front-page document; used by tests.
    pub fn from_fixture_str(html: &str) -> Self {
        Self {
            mode: Mode::Fixture(html.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            base_url: url.clone(),
            mode: Mode::Http {
                url,
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_front_page(&self, html: &str) -> Vec<Candidate> {
        // Story rows in document order; each story's title and score live
        // between its athing tag and the next one.
        let starts: Vec<_> = RE_ATHING.find_iter(html).collect();
        let mut out = Vec::new();

        for (i, m) in starts.iter().take(PER_PROVIDER_CAP).enumerate() {
            let seg_end = starts
                .get(i + 1)
                .map(|n| n.start())
                .unwrap_or_else(|| html.len());
            let segment = &html[m.end()..seg_end];

            let Some(caps) = RE_TITLELINE.captures(segment) else {
                continue;
            };
            let href = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let title = clean_title(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
            if title.is_empty() {
                continue;
            }

            let raw_signal = RE_SCORE
                .captures(segment)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);

            out.push(Candidate::new(
                title,
                absolutize(&self.base_url, href),
                SOURCE_TAG,
                raw_signal,
            ));
        }

        out
    }
}

fn clean_title(raw: &str) -> String {
    let stripped = RE_TAGS.replace_all(raw, "");
    html_escape::decode_html_entities(stripped.as_ref())
        .trim()
        .to_string()
}

#[async_trait::async_trait]
impl SourceProvider for HackerNewsProvider {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>> {
        match &self.mode {
            Mode::Fixture(html) => Ok(self.parse_front_page(html)),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("hacker news http get()")?
                    .text()
                    .await
                    .context("hacker news http .text()")?;
                Ok(self.parse_front_page(&body))
            }
        }
    }

    fn name(&self) -> &str {
        SOURCE_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u32, href: &str, title: &str, score: Option<u32>) -> String {
        let mut s = format!(
            r#"<tr class='athing' id='{id}'><td class="title"><span class="titleline"><a href="{href}">{title}</a></span></td></tr>"#
        );
        s.push_str("<tr><td class=\"subtext\">");
        if let Some(n) = score {
            s.push_str(&format!(
                r#"<span class="score" id="score_{id}">{n} points</span>"#
            ));
        }
        s.push_str("</td></tr>");
        s
    }

    #[test]
    fn parses_title_url_and_score() {
        let html = story(1, "https://example.com/story", "Big Story", Some(123));
        let p = HackerNewsProvider::from_fixture_str(&html);
        let got = p.parse_front_page(&html);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Big Story");
        assert_eq!(got[0].url, "https://example.com/story");
        assert_eq!(got[0].source, "Hacker News");
        assert_eq!(got[0].raw_signal, 123);
        assert_eq!(got[0].score, 12.3);
    }

    #[test]
    fn missing_score_becomes_zero_not_dropped() {
        let html = story(2, "https://example.com/job", "Hiring engineers", None);
        let p = HackerNewsProvider::from_fixture_str(&html);
        let got = p.parse_front_page(&html);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].raw_signal, 0);
    }

    #[test]
    fn relative_links_resolve_against_base() {
        let html = story(3, "item?id=3", "Ask HN: something", Some(10));
        let p = HackerNewsProvider::from_fixture_str(&html);
        let got = p.parse_front_page(&html);
        assert_eq!(got[0].url, "https://news.ycombinator.com/item?id=3");
    }

    #[test]
    fn entities_are_decoded_in_titles() {
        let html = story(4, "https://e.com", "Q&amp;A with the team", Some(5));
        let p = HackerNewsProvider::from_fixture_str(&html);
        assert_eq!(p.parse_front_page(&html)[0].title, "Q&A with the team");
    }

    #[test]
    fn stops_at_per_provider_cap() {
        let html: String = (0..40)
            .map(|i| story(i, "https://e.com", &format!("story {i}"), Some(i)))
            .collect();
        let p = HackerNewsProvider::from_fixture_str(&html);
        assert_eq!(p.parse_front_page(&html).len(), PER_PROVIDER_CAP);
    }
}
