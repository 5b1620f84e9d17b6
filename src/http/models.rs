//! HTTP wire types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Response for POST /task.
#[derive(Debug, Serialize)]
pub struct TaskQueuedResponse {
    pub status: &'static str,
}

impl TaskQueuedResponse {
    pub fn queued() -> Self {
        Self {
            status: "task queued",
        }
    }
}

/// Response for GET /stats. The field names are the wire contract.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub valkey_keys_count: i64,
    pub queue_backlog_length: i64,
    pub worker_processed_count: i64,
}

impl From<crate::model::Stats> for StatsResponse {
    fn from(stats: crate::model::Stats) -> Self {
        Self {
            valkey_keys_count: stats.key_count,
            queue_backlog_length: stats.queue_depth,
            worker_processed_count: stats.processed_count,
        }
    }
}

/// Error envelope returned to HTTP callers.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps pipeline errors onto HTTP status codes. Producer-side failures are
/// server faults from the caller's perspective, never silent drops.
pub struct HttpError(pub crate::error::Error);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            crate::error::Error::Broker(_) | crate::error::Error::CounterStore(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<crate::error::Error> for HttpError {
    fn from(e: crate::error::Error) -> Self {
        Self(e)
    }
}
