// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod error;
pub mod format;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod ranking;
pub mod repo;
pub mod schedule;
pub mod scoring;
pub mod trigger;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::format::PostFormatter;
pub use crate::model::{
    Candidate, PostRecord, PostStatus, RankedSet, RunOutcome, ScheduleConfig, StatsSnapshot,
};
pub use crate::pipeline::{Pipeline, PipelineConfig};
pub use crate::ranking::Ranker;
pub use crate::repo::{MemoryRepository, Repository};
pub use crate::scoring::Scorer;
