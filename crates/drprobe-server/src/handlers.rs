//! Endpoint handlers. Each data-touching handler makes exactly one store
//! call and maps its result to 200 or `{node, error}` with 500.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{Html, Json};
use drprobe_store::{EventLimit, Role};
use serde_json::Value;
use tracing::debug;

use crate::responses::{ApiError, HealthResponse, LastResponse, StatusResponse, WriteResponse};
use crate::server::AppState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        node: state.info.node.clone(),
    })
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let node = &state.info.node;
    let in_recovery = state
        .store
        .is_in_recovery()
        .await
        .map_err(|e| ApiError::store(node, "status", e))?;

    Ok(Json(StatusResponse {
        node: node.clone(),
        db_host: state.info.db_host.clone(),
        role: Role::from_recovery(in_recovery),
    }))
}

/// POST /write
pub async fn write(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WriteResponse>, ApiError> {
    let node = &state.info.node;
    let note = note_from_body(&body);

    let inserted = state
        .store
        .record_event(node, &note)
        .await
        .map_err(|e| ApiError::store(node, "write", e))?;
    debug!(id = inserted.id, "event recorded");

    Ok(Json(WriteResponse {
        node: node.clone(),
        inserted_id: inserted.id,
        ts: inserted.ts,
    }))
}

/// GET /last?n=
pub async fn last(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<LastResponse>, ApiError> {
    let node = &state.info.node;
    let limit = EventLimit::from_query(params.get("n").map(String::as_str));

    let rows = state
        .store
        .recent_events(limit)
        .await
        .map_err(|e| ApiError::store(node, "last", e))?;

    Ok(Json(LastResponse {
        node: node.clone(),
        rows,
    }))
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Extract `note` from a write body. A missing or non-JSON body, or a
/// `note` that is not a string, yields an empty note.
pub fn note_from_body(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("note"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_extracted() {
        assert_eq!(note_from_body(br#"{"note":"failover drill"}"#), "failover drill");
    }

    #[test]
    fn missing_note_is_empty() {
        assert_eq!(note_from_body(b"{}"), "");
        assert_eq!(note_from_body(b""), "");
    }

    #[test]
    fn invalid_json_is_empty() {
        assert_eq!(note_from_body(b"{not json"), "");
    }

    #[test]
    fn non_string_note_is_empty() {
        assert_eq!(note_from_body(br#"{"note":42}"#), "");
        assert_eq!(note_from_body(br#"{"note":null}"#), "");
        assert_eq!(note_from_body(br#"{"note":["a"]}"#), "");
        assert_eq!(note_from_body(br#"["note"]"#), "");
    }

    #[test]
    fn index_page_is_html() {
        assert!(INDEX_HTML.contains("<html"));
    }
}
