//! Health check handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::state::AppState;

/// Liveness probe - process is running.
pub async fn liveness_check(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the storage directory must be reachable.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match tokio::fs::metadata(&state.config.storage_dir).await {
        Ok(meta) if meta.is_dir() => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "storage": "ready" })),
        ),
        Ok(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "not_ready",
                "storage": "not_ready: storage path is not a directory"
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "storage": format!("not_ready: {}", e)
                })),
            )
        }
    }
}
