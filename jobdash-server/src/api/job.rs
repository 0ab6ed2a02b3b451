//! Job API Handlers
//!
//! JSON endpoints for listing, adding and retrying jobs.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::PathRejection},
    http::StatusCode,
};
use jobdash_core::domain::job::JobRecord;
use jobdash_core::dto::job::{CreateJob, JobOptions, JobQuery, RetryJob};

use crate::api::error::{ApiError, ApiResult};
use crate::service::job_service;
use crate::state::AppState;

/// GET /api/jobs
/// List jobs, filtered and sorted by the query string
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> ApiResult<Json<Vec<JobRecord>>> {
    tracing::debug!("Listing jobs: {:?}", query);

    let jobs = job_service::list_jobs(&state, &query).await?;

    Ok(Json(jobs))
}

/// POST /api/jobs
/// Add a new job
pub async fn add_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJob>,
) -> ApiResult<(StatusCode, Json<JobRecord>)> {
    tracing::info!("Adding job '{}' for client '{}'", req.job_name, req.client);

    let job = job_service::add_job(&state, req).await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/jobs/{job_id}/retry
/// Retry a job; an empty body or `{}` uses the default message
pub async fn retry_job(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<JobRecord>> {
    let Path(job_id) = path?;
    let req = parse_retry_body(&body)?;
    tracing::info!("Retrying job: {}", job_id);

    let job = job_service::retry_job(&state, job_id, req.message).await?;

    Ok(Json(job))
}

fn parse_retry_body(body: &[u8]) -> ApiResult<RetryJob> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RetryJob::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid retry request: {}", e)))
}

/// GET /api/jobs/options
/// Distinct clients and statuses for filter selectors
pub async fn job_options(State(state): State<AppState>) -> ApiResult<Json<JobOptions>> {
    let options = job_service::job_options(&state).await?;

    Ok(Json(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_retry_body_uses_default_message() {
        assert_eq!(parse_retry_body(b"").unwrap().message, None);
        assert_eq!(parse_retry_body(b"  \n").unwrap().message, None);
        assert_eq!(parse_retry_body(b"{}").unwrap().message, None);
    }

    #[test]
    fn test_retry_body_with_message() {
        let req = parse_retry_body(br#"{"message": "Retried by operator"}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("Retried by operator"));
    }

    #[test]
    fn test_malformed_retry_body_is_bad_request() {
        let err = parse_retry_body(b"{not json").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
