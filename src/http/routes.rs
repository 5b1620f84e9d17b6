//! HTTP route handlers.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::AppState;
use super::models::{HttpError, StatsResponse, TaskQueuedResponse};

/// Build the intake router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/task", post(submit_task_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /task — durably enqueue one task.
///
/// Fire-and-forget: the response acknowledges the publish, not the
/// processing. Failure surfaces as a 5xx with nothing queued.
async fn submit_task_handler(
    State(state): State<AppState>,
    Json(task): Json<serde_json::Value>,
) -> Result<Json<TaskQueuedResponse>, HttpError> {
    state.dispatcher.enqueue(task).await?;
    Ok(Json(TaskQueuedResponse::queued()))
}

/// GET /stats — point-in-time backlog and throughput snapshot.
async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, HttpError> {
    let stats = state.stats.snapshot().await?;
    Ok(Json(stats.into()))
}

/// GET /health — broker liveness.
async fn health_handler(State(state): State<AppState>) -> Result<&'static str, HttpError> {
    state.broker.health_check().await?;
    Ok("ok")
}
