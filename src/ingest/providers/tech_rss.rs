//! Generic RSS provider for feeds like TechCrunch or The Verge.
//!
//! RSS carries no vote counts, so every candidate leaves here with
//! `raw_signal = 0` and competes on keyword boosts alone. Items are ordered
//! newest-first by pubDate before the per-provider cap applies.

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::ingest::{absolutize, SourceProvider, PER_PROVIDER_CAP};
use crate::model::Candidate;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

fn parse_rfc2822_to_unix(ts: &str) -> u64 {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
        .unwrap_or(0)
}

pub struct TechRssProvider {
    name: String,
    feed_url: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl TechRssProvider {
    pub fn from_fixture_str(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            feed_url: String::new(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(name: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feed_url: feed_url.into(),
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_feed(&self, xml: &str) -> Result<Vec<Candidate>> {
        let rss: Rss = from_str(xml).context("parsing rss xml")?;

        let mut dated = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let title = it
                .title
                .as_deref()
                .map(|t| html_escape::decode_html_entities(t).trim().to_string())
                .unwrap_or_default();
            let Some(link) = it.link.as_deref().filter(|l| !l.is_empty()) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }

            let published = it
                .pub_date
                .as_deref()
                .map(parse_rfc2822_to_unix)
                .unwrap_or(0);

            dated.push((
                published,
                Candidate::new(title, absolutize(&self.feed_url, link), &self.name, 0),
            ));
        }

        // Newest first; equal timestamps keep feed order.
        dated.sort_by(|a, b| b.0.cmp(&a.0));
        dated.truncate(PER_PROVIDER_CAP);
        Ok(dated.into_iter().map(|(_, c)| c).collect())
    }
}

#[async_trait::async_trait]
impl SourceProvider for TechRssProvider {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>> {
        match &self.mode {
            Mode::Fixture(xml) => self.parse_feed(xml),
            Mode::Http { client } => {
                let body = client
                    .get(&self.feed_url)
                    .send()
                    .await
                    .with_context(|| format!("{} http get()", self.name))?
                    .text()
                    .await
                    .with_context(|| format!("{} http .text()", self.name))?;
                self.parse_feed(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
