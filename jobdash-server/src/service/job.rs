//! Job Service
//!
//! Business logic for adding, retrying and listing jobs.

use jobdash_core::BoardError;
use jobdash_core::JobBoard;
use jobdash_core::domain::job::JobRecord;
use jobdash_core::dto::job::{CreateJob, JobOptions, JobQuery};

use crate::repository::{JobRepository, RepositoryError};
use crate::state::AppState;

/// Service error type
#[derive(Debug)]
pub enum JobError {
    NotFound(i64),
    ValidationError(String),
    RepositoryError(RepositoryError),
}

impl From<RepositoryError> for JobError {
    fn from(err: RepositoryError) -> Self {
        JobError::RepositoryError(err)
    }
}

impl From<BoardError> for JobError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::Validation(msg) => JobError::ValidationError(msg),
            BoardError::NotFound(id) => JobError::NotFound(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, JobError>;

async fn load_board(repository: &dyn JobRepository) -> Result<JobBoard> {
    let records = repository.fetch_all().await?;
    Ok(JobBoard::from_records(records))
}

/// Add a new job
///
/// Allocates the next free id when the request carries none.
pub async fn add_job(state: &AppState, req: CreateJob) -> Result<JobRecord> {
    let _guard = state.write_lock.lock().await;

    let mut board = load_board(state.repository.as_ref()).await?;
    let job_id = match req.job_id {
        Some(job_id) => job_id,
        None => board.next_job_id()?.to_string(),
    };

    let job = board.add_job(&req.client, &job_id, &req.job_name, &req.parameters)?;
    state.repository.upsert(&job).await?;

    tracing::info!(
        job_id = job.job_id,
        client = %job.client,
        "Added job '{}'",
        job.job_name
    );

    Ok(job)
}

/// Retry a job, optionally recording a message
pub async fn retry_job(state: &AppState, job_id: i64, message: Option<String>) -> Result<JobRecord> {
    let _guard = state.write_lock.lock().await;

    let mut board = load_board(state.repository.as_ref()).await?;
    let job = board.retry_job(job_id, message.as_deref())?;
    state.repository.upsert(&job).await?;

    tracing::info!(
        job_id = job.job_id,
        retry_count = job.retry_count,
        "Job marked for retry"
    );

    Ok(job)
}

/// List jobs matching a query
pub async fn list_jobs(state: &AppState, query: &JobQuery) -> Result<Vec<JobRecord>> {
    let (filter, sort) = query.resolve()?;
    let board = load_board(state.repository.as_ref()).await?;

    let jobs = board.list_jobs(&filter, sort);
    tracing::debug!("Listed {} of {} jobs", jobs.len(), board.len());

    Ok(jobs)
}

/// Distinct clients and statuses for the filter selectors
pub async fn job_options(state: &AppState) -> Result<JobOptions> {
    let board = load_board(state.repository.as_ref()).await?;

    Ok(JobOptions {
        clients: board.client_options(),
        statuses: board.status_options(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobdash_core::domain::job::JobStatus;
    use jobdash_core::query::SortKey;

    fn create(client: &str, job_id: Option<&str>, job_name: &str) -> CreateJob {
        CreateJob {
            client: client.to_string(),
            job_id: job_id.map(str::to_string),
            job_name: job_name.to_string(),
            parameters: "a, b ,,c".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_job_persists_record() {
        let state = AppState::in_memory();

        let job = add_job(&state, create("Acme", Some("10"), "Scan")).await.unwrap();
        assert_eq!(job.job_id, 10);
        assert_eq!(job.parameters, vec!["a", "b", "c"]);

        let stored = state.repository.fetch_all().await.unwrap();
        assert_eq!(stored, vec![job]);
    }

    #[tokio::test]
    async fn test_add_job_allocates_next_id() {
        let state = AppState::in_memory();

        add_job(&state, create("Acme", Some("4"), "Scan")).await.unwrap();
        let job = add_job(&state, create("Acme", None, "Fetch")).await.unwrap();

        assert_eq!(job.job_id, 5);
    }

    #[tokio::test]
    async fn test_add_job_without_id_after_max_id_is_rejected() {
        let state = AppState::in_memory();
        add_job(&state, create("Acme", Some("9223372036854775807"), "Scan"))
            .await
            .unwrap();

        let err = add_job(&state, create("Acme", None, "Fetch")).await.unwrap_err();

        assert!(matches!(err, JobError::ValidationError(msg) if msg == "no free job id"));
        assert_eq!(state.repository.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_validation_error() {
        let state = AppState::in_memory();
        add_job(&state, create("Acme", Some("1"), "Scan")).await.unwrap();

        let err = add_job(&state, create("Globex", Some("1"), "Other"))
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::ValidationError(_)));
        assert_eq!(state.repository.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_unknown_job_is_not_found() {
        let state = AppState::in_memory();
        let err = retry_job(&state, 3, None).await.unwrap_err();
        assert!(matches!(err, JobError::NotFound(3)));
        assert!(state.repository.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_then_list_sorted() {
        let state = AppState::in_memory();
        add_job(&state, create("A", Some("1"), "Scan")).await.unwrap();
        add_job(&state, create("B", Some("2"), "Scan")).await.unwrap();
        retry_job(&state, 2, Some("manual".to_string())).await.unwrap();

        let query = JobQuery::default().with_sort(SortKey::RetryCount);
        let jobs = list_jobs(&state, &query).await.unwrap();
        assert_eq!(jobs[0].job_id, 2);
        assert_eq!(jobs[0].status, JobStatus::Retried);
        assert_eq!(jobs[0].message, "manual");

        let options = job_options(&state).await.unwrap();
        assert_eq!(options.clients, vec!["A", "B"]);
        assert_eq!(options.statuses, vec![JobStatus::Pending, JobStatus::Retried]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_get_distinct_ids() {
        let state = AppState::in_memory();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move {
                    add_job(&state, create("Acme", None, &format!("job-{}", i))).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<_> = state
            .repository
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|j| j.job_id)
            .collect();
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_invalid_query_is_validation_error() {
        let state = AppState::in_memory();
        let query = JobQuery {
            sort: Some("priority".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            list_jobs(&state, &query).await,
            Err(JobError::ValidationError(_))
        ));
    }
}
