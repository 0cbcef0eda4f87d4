//! Tech News Poster — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the pipeline, repository, publishers
//! and the schedule trigger task.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tech_news_poster::api::{create_router, AppState};
use tech_news_poster::format::PostFormatter;
use tech_news_poster::ingest::config as provider_config;
use tech_news_poster::metrics::Metrics;
use tech_news_poster::notify::{
    instagram::InstagramPublisher, linkedin::LinkedInPublisher, Publisher,
};
use tech_news_poster::pipeline::{Pipeline, PipelineConfig};
use tech_news_poster::ranking::Ranker;
use tech_news_poster::repo::MemoryRepository;
use tech_news_poster::scoring::Scorer;
use tech_news_poster::trigger::spawn_schedule_trigger;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tech_news_poster=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Publishers are optional: an unconfigured platform is skipped at startup
/// rather than failing every job at publish time.
fn wire_publishers() -> Vec<Box<dyn Publisher>> {
    let mut out: Vec<Box<dyn Publisher>> = Vec::new();
    match LinkedInPublisher::from_env() {
        Some(p) => out.push(Box::new(p)),
        None => tracing::info!("linkedin credentials not set, platform disabled"),
    }
    match InstagramPublisher::from_env() {
        Some(p) => out.push(Box::new(p)),
        None => tracing::info!("instagram credentials not set, platform disabled"),
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = PipelineConfig::default();
    let metrics = Metrics::init(cfg.post_limit);

    let specs = provider_config::load_specs_default()?;
    let providers = provider_config::build_providers(&specs)?;
    tracing::info!(providers = providers.len(), "provider wiring complete");

    let repo = Arc::new(MemoryRepository::new());
    let pipeline = Arc::new(Pipeline::new(
        providers,
        Scorer::new(),
        Ranker::new(),
        PostFormatter::new(),
        repo.clone(),
        wire_publishers(),
        cfg,
    ));

    spawn_schedule_trigger(pipeline.clone());

    let state = AppState {
        repo,
        pipeline,
    };
    let router = create_router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
