//! API Module
//!
//! HTTP layer for the dashboard server: the JSON API under `/api` and the
//! server-rendered dashboard page at `/`.

pub mod dashboard;
pub mod error;
pub mod health;
pub mod job;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the main router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/jobs", get(job::list_jobs).post(job::add_job))
        .route("/jobs/options", get(job::job_options))
        .route("/jobs/{job_id}/retry", post(job::retry_job))
        .layer(CorsLayer::permissive());

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Dashboard page and its form actions
        .route("/", get(dashboard::show_dashboard))
        .route("/jobs", post(dashboard::submit_job))
        .route("/jobs/{job_id}/retry", post(dashboard::submit_retry))
        // JSON API
        .nest("/api", api)
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
