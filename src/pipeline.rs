//! pipeline.rs — Composes source providers, scorer, ranker, repository,
//! formatter and publishers into one run.
//!
//! Every collaborator is injected at construction; the pipeline keeps no
//! ambient globals and no cross-run state beyond what the repository stores.

use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::PipelineError;
use crate::format::PostFormatter;
use crate::ingest::{self, SourceProvider};
use crate::model::{PostRecord, PostStatus, RunOutcome};
use crate::notify::Publisher;
use crate::ranking::{Ranker, PRESENTATION_LIMIT, STORAGE_LIMIT};
use crate::repo::Repository;
use crate::scoring::Scorer;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_runs_total", "Completed pipeline runs.");
        describe_counter!(
            "pipeline_no_data_total",
            "Runs where every provider came back empty."
        );
        describe_counter!("provider_errors_total", "Provider fetch/parse errors.");
        describe_counter!("posts_published_total", "Posts accepted by a platform.");
        describe_counter!("posts_failed_total", "Posts rejected by a platform.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last completed."
        );
    });
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Ranked candidates persisted per run.
    pub store_limit: usize,
    /// Ranked candidates rendered into a post.
    pub post_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_limit: STORAGE_LIMIT,
            post_limit: PRESENTATION_LIMIT,
        }
    }
}

/// Held for the duration of one run; enforces at-most-one-concurrent-run
/// per process.
pub struct RunPermit {
    _guard: OwnedMutexGuard<()>,
}

pub struct Pipeline {
    providers: Vec<Box<dyn SourceProvider>>,
    scorer: Scorer,
    ranker: Ranker,
    formatter: PostFormatter,
    repo: Arc<dyn Repository>,
    publishers: Vec<Box<dyn Publisher>>,
    cfg: PipelineConfig,
    run_guard: Arc<Mutex<()>>,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        providers: Vec<Box<dyn SourceProvider>>,
        scorer: Scorer,
        ranker: Ranker,
        formatter: PostFormatter,
        repo: Arc<dyn Repository>,
        publishers: Vec<Box<dyn Publisher>>,
        cfg: PipelineConfig,
    ) -> Self {
        ensure_metrics_described();
        Self {
            providers,
            scorer,
            ranker,
            formatter,
            repo,
            publishers,
            cfg,
            run_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn repository(&self) -> Arc<dyn Repository> {
        self.repo.clone()
    }

    /// Claims the process-wide run slot; None while another run is active.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        self.run_guard
            .clone()
            .try_lock_owned()
            .ok()
            .map(|g| RunPermit { _guard: g })
    }

    /// Scrape → score → rank → persist. Zero candidates across all
    /// providers is the recognized no-data state: nothing is persisted and
    /// the outcome says so. A storage error leaves nothing half-written
    /// (the repository batch write is atomic) and fails the run.
    pub async fn run_once(&self) -> Result<RunOutcome, PipelineError> {
        let mut candidates = ingest::fetch_all(&self.providers).await;

        if candidates.is_empty() {
            tracing::info!("no candidates from any provider, skipping persist");
            counter!("pipeline_no_data_total").increment(1);
            return Ok(RunOutcome::NoData);
        }

        self.scorer.score_all(&mut candidates);
        let ranked = self.ranker.rank(&candidates, self.cfg.store_limit);
        self.repo.save_candidates(ranked.items())?;

        counter!("pipeline_runs_total").increment(1);
        gauge!("pipeline_last_run_ts").set(Utc::now().timestamp() as f64);

        tracing::info!(
            fetched = candidates.len(),
            stored = ranked.len(),
            "pipeline run complete"
        );
        Ok(RunOutcome::Ranked(ranked.top(self.cfg.post_limit)))
    }

    /// Full scrape-and-post job: run_once, then render and publish to every
    /// configured platform. Each publish outcome is recorded on its own
    /// PostRecord; a platform failure never aborts the others and is never
    /// retried here.
    pub async fn run_job(&self) -> Result<RunOutcome, PipelineError> {
        let outcome = self.run_once().await?;
        let RunOutcome::Ranked(ref ranked) = outcome else {
            return Ok(outcome);
        };

        let date_label = Utc::now().format("%B %d, %Y").to_string();
        let content = self.formatter.render(ranked, &date_label);

        for publisher in &self.publishers {
            let id = self
                .repo
                .save_post(PostRecord::pending(publisher.platform(), content.clone()))?;

            match publisher.publish(&content).await {
                Ok(()) => {
                    self.repo.update_post_status(id, PostStatus::Posted)?;
                    counter!("posts_published_total").increment(1);
                    tracing::info!(platform = publisher.platform(), post_id = id, "published");
                }
                Err(e) => {
                    self.repo.update_post_status(id, PostStatus::Failed)?;
                    counter!("posts_failed_total").increment(1);
                    tracing::warn!(
                        error = %e,
                        platform = publisher.platform(),
                        post_id = id,
                        "publish failed"
                    );
                }
            }
        }

        Ok(outcome)
    }

    /// run_job guarded by the run slot; AlreadyRunning when a previous run
    /// is still executing.
    pub async fn try_run_job(&self) -> Result<RunOutcome, PipelineError> {
        let Some(_permit) = self.try_acquire() else {
            return Ok(RunOutcome::AlreadyRunning);
        };
        self.run_job().await
    }
}
