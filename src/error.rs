// src/error.rs
// Error taxonomy for the storage, publishing and schedule seams.
// Provider fetch/parse errors stay anyhow-typed inside ingest; they are
// recovered there and never cross this boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no post with id {0}")]
    PostNotFound(u64),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("storage failure: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{platform} credentials not configured ({var})")]
    MissingCredentials {
        platform: &'static str,
        var: &'static str,
    },

    #[error("{platform} request failed: {source}")]
    Transport {
        platform: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{platform} rejected the post: HTTP {status}")]
    Rejected { platform: &'static str, status: u16 },
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule needs at least one day")]
    EmptyDays,

    #[error("unknown weekday: {0:?}")]
    UnknownDay(String),

    #[error("time must be HH:MM (24h), got {0:?}")]
    BadTime(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}
