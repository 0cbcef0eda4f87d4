// src/trigger.rs
// Background task that drives the pipeline from the stored schedule. The
// pipeline owns no wait loop; this task just checks the config once a
// minute and fires at most once per matching minute.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::model::RunOutcome;
use crate::pipeline::Pipeline;
use crate::schedule;

pub fn spawn_schedule_trigger(pipeline: Arc<Pipeline>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        let mut last_fired: Option<String> = None;

        loop {
            ticker.tick().await;
            let now = Utc::now();

            let cfg = match pipeline.repository().get_schedule() {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!(error = %e, "trigger could not read schedule");
                    continue;
                }
            };

            if !schedule::should_fire(&cfg, now) {
                continue;
            }

            // One firing per matching minute, even with sub-minute ticks.
            let minute_key = now.format("%Y-%m-%d %H:%M").to_string();
            if last_fired.as_deref() == Some(minute_key.as_str()) {
                continue;
            }
            last_fired = Some(minute_key);

            tracing::info!(target: "trigger", time = %cfg.time, "schedule fired, running job");
            match pipeline.try_run_job().await {
                Ok(RunOutcome::AlreadyRunning) => {
                    tracing::warn!(target: "trigger", "previous run still active, skipping tick");
                }
                Ok(RunOutcome::NoData) => {
                    tracing::info!(target: "trigger", "scheduled run found no data");
                }
                Ok(RunOutcome::Ranked(set)) => {
                    tracing::info!(target: "trigger", stored = set.len(), "scheduled run complete");
                }
                // Keep ticking after a failed job; failures are state, not
                // reasons to stop the scheduler.
                Err(e) => {
                    tracing::error!(target: "trigger", error = %e, "scheduled run failed");
                }
            }
        }
    })
}
