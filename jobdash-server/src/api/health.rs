//! Health Check API Handler
//!
//! Reports whether the job store can be read.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// GET /health
/// `200` with the job count when the store answers, `503` otherwise
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.fetch_all().await {
        Ok(jobs) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "jobs": jobs.len() })),
        ),
        Err(err) => {
            tracing::warn!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "unavailable" })),
            )
        }
    }
}
