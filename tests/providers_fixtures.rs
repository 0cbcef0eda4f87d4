// tests/providers_fixtures.rs
//
// Provider parsing against captured fixture documents, plus the
// degrade-gracefully contract of fetch_all.

use anyhow::anyhow;

use tech_news_poster::ingest::providers::hacker_news::HackerNewsProvider;
use tech_news_poster::ingest::providers::tech_rss::TechRssProvider;
use tech_news_poster::ingest::{fetch_all, SourceProvider};
use tech_news_poster::model::Candidate;

const HN_FIXTURE: &str = include_str!("fixtures/hn_front_page.html");
const RSS_FIXTURE: &str = include_str!("fixtures/tech_rss.xml");

#[tokio::test]
async fn hn_fixture_parses_stories_with_signals() {
    let p = HackerNewsProvider::from_fixture_str(HN_FIXTURE);
    let got = p.fetch_latest().await.expect("fixture parse");

    assert_eq!(got.len(), 4);
    assert_eq!(got[0].title, "OpenAI launches new model");
    assert_eq!(got[0].url, "https://example.com/openai-model");
    assert_eq!(got[0].raw_signal, 50);
    assert_eq!(got[1].raw_signal, 80);

    // Relative Ask HN link resolved against the base, entity decoded.
    assert_eq!(got[2].title, "Ask HN: Q&A about security breach response");
    assert_eq!(got[2].url, "https://news.ycombinator.com/item?id=45003");
    assert_eq!(got[2].raw_signal, 120);

    // Job row has no score span; kept with signal 0.
    assert_eq!(got[3].raw_signal, 0);

    for c in &got {
        assert_eq!(c.source, "Hacker News");
        assert!(c.url.starts_with("http"), "url must be absolute: {}", c.url);
    }
}

#[tokio::test]
async fn rss_fixture_parses_newest_first_with_zero_signal() {
    let p = TechRssProvider::from_fixture_str("TechCrunch", RSS_FIXTURE);
    let got = p.fetch_latest().await.expect("fixture parse");

    assert_eq!(got.len(), 3);
    assert_eq!(
        got[0].title,
        "Startup raises $40M funding round for robotics platform"
    );
    assert_eq!(got[1].title, "Quantum computing breakthrough announced");
    assert!(got.iter().all(|c| c.raw_signal == 0));
    assert!(got.iter().all(|c| c.source == "TechCrunch"));
}

struct FailingProvider;

#[async_trait::async_trait]
impl SourceProvider for FailingProvider {
    async fn fetch_latest(&self) -> anyhow::Result<Vec<Candidate>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &str {
        "Broken"
    }
}

#[tokio::test]
async fn failing_provider_never_halts_the_others() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(FailingProvider),
        Box::new(HackerNewsProvider::from_fixture_str(HN_FIXTURE)),
        Box::new(FailingProvider),
    ];

    let all = fetch_all(&providers).await;
    assert_eq!(all.len(), 4, "healthy provider results survive failures");
}

#[tokio::test]
async fn all_providers_failing_yields_empty_not_error() {
    let providers: Vec<Box<dyn SourceProvider>> =
        vec![Box::new(FailingProvider), Box::new(FailingProvider)];
    assert!(fetch_all(&providers).await.is_empty());
}
