//! Repository Module
//!
//! Persistence boundary for the dashboard. A repository only has to read
//! every job row and upsert a single row; everything else happens on a
//! [`jobdash_core::JobBoard`] loaded from it.

pub mod job;
pub mod memory;

use async_trait::async_trait;
use jobdash_core::domain::job::JobRecord;

pub use job::PgJobRepository;
pub use memory::InMemoryJobRepository;

/// Repository error type
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored row for job {job_id}: {reason}")]
    InvalidRow { job_id: i64, reason: String },
}

/// Storage for job rows
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Fetch every job row in insertion order
    async fn fetch_all(&self) -> Result<Vec<JobRecord>, RepositoryError>;

    /// Insert a row, or replace the row with the same `job_id`, atomically
    async fn upsert(&self, job: &JobRecord) -> Result<(), RepositoryError>;
}
