//! JSON bodies returned by the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use drprobe_store::{Event, Role, StoreError};
use serde::Serialize;
use tracing::{error, warn};

/// `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Reporting node.
    pub node: String,
}

/// `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Reporting node.
    pub node: String,
    /// Configured database host.
    pub db_host: String,
    /// `primary` or `standby`.
    pub role: Role,
}

/// `POST /write`.
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Node the event is attributed to.
    pub node: String,
    /// Store-assigned id of the new row.
    pub inserted_id: i64,
    /// Store-assigned timestamp of the new row.
    #[serde(serialize_with = "drprobe_store::event::ts_format::serialize")]
    pub ts: DateTime<Utc>,
}

/// `GET /last`.
#[derive(Debug, Clone, Serialize)]
pub struct LastResponse {
    /// Reporting node.
    pub node: String,
    /// Newest first.
    pub rows: Vec<Event>,
}

/// Body of every 500 response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Reporting node.
    pub node: String,
    /// Store message.
    pub error: String,
}

/// A store failure, reported to the caller as `{node, error}` with 500.
#[derive(Debug)]
pub struct ApiError {
    /// Reporting node.
    pub node: String,
    /// Underlying failure.
    pub source: StoreError,
}

impl ApiError {
    /// Log the failure as seen by the `op` endpoint and wrap it.
    pub fn store(node: &str, op: &'static str, source: StoreError) -> Self {
        if source.is_read_only() {
            warn!(op, node, error = %source, "store is read-only");
        } else {
            error!(op, node, error = %source, "store request failed");
        }
        Self {
            node: node.to_string(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            node: self.node,
            error: self.source.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
