//! PostgreSQL Job Repository
//!
//! Handles all database operations related to job rows.

use async_trait::async_trait;
use jobdash_core::domain::job::{JobRecord, JobStatus};
use sqlx::PgPool;

use super::{JobRepository, RepositoryError};

#[derive(Debug, Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn fetch_all(&self) -> Result<Vec<JobRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT job_id, client, job_name, parameters, status, message,
                   executed_at, ref_num, retry_count
            FROM jobs
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!("Fetched {} job rows", rows.len());

        rows.into_iter().map(JobRecord::try_from).collect()
    }

    async fn upsert(&self, job: &JobRecord) -> Result<(), RepositoryError> {
        let retry_count = i32::try_from(job.retry_count).map_err(|_| RepositoryError::InvalidRow {
            job_id: job.job_id,
            reason: format!("retry count {} does not fit the column", job.retry_count),
        })?;

        sqlx::query(
            r#"
            INSERT INTO jobs (job_id, client, job_name, parameters, status, message,
                              executed_at, ref_num, retry_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (job_id) DO UPDATE
            SET client = EXCLUDED.client,
                job_name = EXCLUDED.job_name,
                parameters = EXCLUDED.parameters,
                status = EXCLUDED.status,
                message = EXCLUDED.message,
                executed_at = EXCLUDED.executed_at,
                ref_num = EXCLUDED.ref_num,
                retry_count = EXCLUDED.retry_count
            "#,
        )
        .bind(job.job_id)
        .bind(&job.client)
        .bind(&job.job_name)
        .bind(&job.parameters)
        .bind(job.status.as_str())
        .bind(&job.message)
        .bind(job.executed_at)
        .bind(&job.ref_num)
        .bind(retry_count)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Upserted job {}", job.job_id);

        Ok(())
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    job_id: i64,
    client: String,
    job_name: String,
    parameters: Vec<String>,
    status: String,
    message: String,
    executed_at: Option<chrono::DateTime<chrono::Utc>>,
    ref_num: Option<String>,
    retry_count: i32,
}

impl TryFrom<JobRow> for JobRecord {
    type Error = RepositoryError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        // Rows may be written by the execution engine with its own spellings
        let mut message = row.message;
        let status = row.status.parse::<JobStatus>().unwrap_or_else(|_| {
            tracing::warn!(
                "Job {} has unknown status '{}', displaying a synthetic Pending status",
                row.job_id,
                row.status
            );
            if message.is_empty() {
                message = format!("Unrecognized stored status '{}'", row.status);
            }
            JobStatus::Pending
        });

        let retry_count = u32::try_from(row.retry_count).map_err(|_| RepositoryError::InvalidRow {
            job_id: row.job_id,
            reason: format!("negative retry count {}", row.retry_count),
        })?;

        Ok(JobRecord {
            client: row.client,
            job_id: row.job_id,
            job_name: row.job_name,
            parameters: row.parameters,
            status,
            message,
            executed_at: row.executed_at,
            ref_num: row.ref_num,
            retry_count,
        })
    }
}
