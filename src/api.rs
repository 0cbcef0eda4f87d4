// src/api.rs
// REST facade over the pipeline and repository, for external dashboards.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::error::RepositoryError;
use crate::model::{Candidate, PostRecord, PostStatus, ScheduleConfig, StatsSnapshot};
use crate::pipeline::Pipeline;
use crate::repo::Repository;
use crate::schedule;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub pipeline: Arc<Pipeline>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/candidates", get(list_candidates))
        .route("/run", post(trigger_run))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}/status", post(update_post_status))
        .route("/schedule", get(get_schedule).put(set_schedule))
        .route("/stats", get(stats))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, String);

fn repo_error(e: RepositoryError) -> ApiError {
    let status = match e {
        RepositoryError::PostNotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::InvalidTransition { .. } => StatusCode::CONFLICT,
        RepositoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

#[derive(Deserialize)]
struct LimitQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

async fn list_candidates(
    State(state): State<AppState>,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let items = state.repo.load_candidates(q.limit).map_err(repo_error)?;
    Ok(Json(items))
}

/// Kicks a scrape-and-post job off in the background. 202 when the job was
/// spawned, 409 while a previous run still holds the run slot.
async fn trigger_run(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(permit) = state.pipeline.try_acquire() else {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "accepted": false, "reason": "run already in progress" })),
        );
    };

    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        let _permit = permit;
        if let Err(e) = pipeline.run_job().await {
            tracing::error!(error = %e, "triggered run failed");
        }
    });

    (StatusCode::ACCEPTED, Json(json!({ "accepted": true })))
}

#[derive(Deserialize)]
struct PostsQuery {
    status: Option<String>,
}

async fn list_posts(
    State(state): State<AppState>,
    Query(q): Query<PostsQuery>,
) -> Result<Json<Vec<PostRecord>>, ApiError> {
    let filter = match q.status.as_deref() {
        None => None,
        Some(s) => Some(PostStatus::parse(s).ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("unknown status: {s:?}"),
        ))?),
    };
    let posts = state.repo.load_posts(filter).map_err(repo_error)?;
    Ok(Json(posts))
}

#[derive(Deserialize)]
struct CreatePostReq {
    platform: String,
    content: String,
    #[serde(default)]
    scheduled_for: Option<chrono::DateTime<chrono::Utc>>,
}

async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<CreatePostReq>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if body.platform.trim().is_empty() || body.content.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "platform and content must be non-empty".into(),
        ));
    }
    let mut draft = PostRecord::pending(body.platform, body.content);
    if let Some(ts) = body.scheduled_for {
        draft = draft.scheduled_for(ts);
    }
    let id = state.repo.save_post(draft).map_err(repo_error)?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

#[derive(Deserialize)]
struct UpdateStatusReq {
    status: String,
}

async fn update_post_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<UpdateStatusReq>,
) -> Result<Json<PostRecord>, ApiError> {
    let status = PostStatus::parse(&body.status).ok_or((
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("unknown status: {:?}", body.status),
    ))?;
    let updated = state
        .repo
        .update_post_status(id, status)
        .map_err(repo_error)?;
    Ok(Json(updated))
}

async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleConfig>, ApiError> {
    Ok(Json(state.repo.get_schedule().map_err(repo_error)?))
}

/// All-or-nothing: a malformed config is rejected here and never reaches
/// the repository.
async fn set_schedule(
    State(state): State<AppState>,
    Json(cfg): Json<ScheduleConfig>,
) -> Result<Json<ScheduleConfig>, ApiError> {
    schedule::validate(&cfg)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    state.repo.set_schedule(cfg.clone()).map_err(repo_error)?;
    Ok(Json(cfg))
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, ApiError> {
    Ok(Json(state.repo.stats().map_err(repo_error)?))
}
