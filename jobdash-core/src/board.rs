//! Job board
//!
//! The store and view model behind the dashboard. A `JobBoard` owns an
//! ordered collection of job records, applies the add and retry mutations,
//! and computes the filtered, sorted projection the presentation layer
//! renders. Insertion order is the default display order.
//!
//! The board is an explicit value: callers load it from whatever backs the
//! dashboard, mutate it, and persist the single record a mutation returns.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::job::{DEFAULT_RETRY_MESSAGE, JobRecord, JobStatus, parse_parameters};
use crate::error::BoardError;
use crate::query::{JobFilter, SortKey};

#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    jobs: Vec<JobRecord>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from persisted rows, keeping their order
    pub fn from_records(jobs: Vec<JobRecord>) -> Self {
        Self { jobs }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn into_records(self) -> Vec<JobRecord> {
        self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn find(&self, job_id: i64) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    /// Next unused job id (`max + 1`, or 1 for an empty board)
    ///
    /// Records are never removed, so ids handed out this way are never reused.
    /// Fails once a job holds `i64::MAX`.
    pub fn next_job_id(&self) -> Result<i64, BoardError> {
        match self.jobs.iter().map(|job| job.job_id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| BoardError::validation("no free job id")),
        }
    }

    /// Add a new pending job stamped with the current time
    pub fn add_job(
        &mut self,
        client: &str,
        job_id: &str,
        job_name: &str,
        parameters: &str,
    ) -> Result<JobRecord, BoardError> {
        self.add_job_at(client, job_id, job_name, parameters, Utc::now())
    }

    /// Add a new pending job executed at `now`
    pub fn add_job_at(
        &mut self,
        client: &str,
        job_id: &str,
        job_name: &str,
        parameters: &str,
        now: DateTime<Utc>,
    ) -> Result<JobRecord, BoardError> {
        let client = client.trim();
        let job_id = job_id.trim();
        let job_name = job_name.trim();

        if client.is_empty() || job_id.is_empty() || job_name.is_empty() {
            return Err(BoardError::validation(
                "Please fill in Client, Job ID, and Job Name.",
            ));
        }

        let job_id = match job_id.parse::<i64>() {
            Ok(id) if id > 0 => id,
            _ => {
                return Err(BoardError::validation(format!(
                    "Job ID '{}' must be a positive integer",
                    job_id
                )));
            }
        };

        if self.find(job_id).is_some() {
            return Err(BoardError::validation(format!(
                "Job ID {} already exists",
                job_id
            )));
        }

        let job = JobRecord {
            client: client.to_string(),
            job_id,
            job_name: job_name.to_string(),
            parameters: parse_parameters(parameters),
            status: JobStatus::Pending,
            message: String::new(),
            executed_at: Some(now),
            ref_num: None,
            retry_count: 0,
        };

        self.jobs.push(job.clone());
        Ok(job)
    }

    /// Retry a job, stamping it with the current time
    pub fn retry_job(&mut self, job_id: i64, message: Option<&str>) -> Result<JobRecord, BoardError> {
        self.retry_job_at(job_id, message, Utc::now())
    }

    /// Retry a job at `now`
    ///
    /// Allowed from any status. The execution time never moves backwards,
    /// even if `now` is earlier than the stored one.
    pub fn retry_job_at(
        &mut self,
        job_id: i64,
        message: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<JobRecord, BoardError> {
        let job = self
            .jobs
            .iter_mut()
            .find(|job| job.job_id == job_id)
            .ok_or(BoardError::NotFound(job_id))?;

        job.retry_count += 1;
        job.status = JobStatus::Retried;
        job.message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_RETRY_MESSAGE)
            .to_string();
        job.executed_at = Some(job.executed_at.map_or(now, |previous| previous.max(now)));

        Ok(job.clone())
    }

    /// Filtered, sorted projection of the board
    ///
    /// Without a sort key records come back in insertion order. Sorting is
    /// stable, so ties keep insertion order too.
    pub fn list_jobs(&self, filter: &JobFilter, sort: Option<SortKey>) -> Vec<JobRecord> {
        let mut jobs: Vec<JobRecord> = self
            .jobs
            .iter()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            sort.sort(&mut jobs);
        }

        jobs
    }

    /// Distinct client names, sorted
    pub fn client_options(&self) -> Vec<String> {
        self.jobs
            .iter()
            .map(|job| job.client.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct statuses present on the board, in declaration order
    pub fn status_options(&self) -> Vec<JobStatus> {
        self.jobs
            .iter()
            .map(|job| job.status)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
