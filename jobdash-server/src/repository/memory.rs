//! In-memory job repository
//!
//! Process-local storage used when no database is configured, and in tests.

use async_trait::async_trait;
use chrono::Utc;
use jobdash_core::domain::job::{JobRecord, JobStatus};
use tokio::sync::RwLock;

use super::{JobRepository, RepositoryError};

#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<Vec<JobRecord>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs: RwLock::new(jobs),
        }
    }

    /// Repository pre-populated with two sample jobs
    pub fn seeded() -> Self {
        let now = Utc::now();
        Self::with_records(vec![
            JobRecord {
                client: "ABC Corp".to_string(),
                job_id: 1,
                job_name: "Cost Metrics Scan".to_string(),
                parameters: vec!["-k eastus".to_string(), "-t 80%".to_string()],
                status: JobStatus::Success,
                message: "Completed Successfully".to_string(),
                executed_at: Some(now),
                ref_num: None,
                retry_count: 0,
            },
            JobRecord {
                client: "XYZ Ltd".to_string(),
                job_id: 2,
                job_name: "Azure Inventory Fetch".to_string(),
                parameters: vec!["-sub Prod".to_string(), "-timeout 30s".to_string()],
                status: JobStatus::Failed,
                message: "Failed: Timeout".to_string(),
                executed_at: Some(now),
                ref_num: None,
                retry_count: 1,
            },
        ])
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn fetch_all(&self) -> Result<Vec<JobRecord>, RepositoryError> {
        Ok(self.jobs.read().await.clone())
    }

    async fn upsert(&self, job: &JobRecord) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        match jobs.iter_mut().find(|existing| existing.job_id == job.job_id) {
            Some(existing) => *existing = job.clone(),
            None => jobs.push(job.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(job_id: i64, client: &str) -> JobRecord {
        JobRecord {
            client: client.to_string(),
            job_id,
            job_name: "Scan".to_string(),
            parameters: Vec::new(),
            status: JobStatus::Pending,
            message: String::new(),
            executed_at: None,
            ref_num: None,
            retry_count: 0,
        }
    }

    #[tokio::test]
    async fn test_upsert_appends_then_replaces_in_place() {
        let repo = InMemoryJobRepository::new();
        repo.upsert(&record(1, "Acme")).await.unwrap();
        repo.upsert(&record(2, "Globex")).await.unwrap();

        let mut updated = record(1, "Acme");
        updated.retry_count = 1;
        updated.status = JobStatus::Retried;
        repo.upsert(&updated).await.unwrap();

        let jobs = repo.fetch_all().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0], updated);
        assert_eq!(jobs[1].client, "Globex");
    }

    #[tokio::test]
    async fn test_seeded_has_unique_ids() {
        let jobs = InMemoryJobRepository::seeded().fetch_all().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_ne!(jobs[0].job_id, jobs[1].job_id);
    }
}
