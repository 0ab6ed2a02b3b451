//! Filters and sort keys for projecting the job board

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::job::{JobRecord, JobStatus};

/// Filter configuration
///
/// Every provided field must match; absent fields impose no constraint.
/// `client` and `status` are exact, case-sensitive matches. The substring
/// fields ignore case, and the date range is inclusive on the UTC calendar
/// date of `executed_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub client: Option<String>,
    pub status: Option<JobStatus>,
    pub job_name_contains: Option<String>,
    pub ref_num_contains: Option<String>,
    pub executed_from: Option<NaiveDate>,
    pub executed_to: Option<NaiveDate>,
}

impl JobFilter {
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        if let Some(client) = &self.client
            && job.client != *client
        {
            return false;
        }

        if let Some(status) = self.status
            && job.status != status
        {
            return false;
        }

        if let Some(needle) = &self.job_name_contains
            && !contains_ignore_case(&job.job_name, needle)
        {
            return false;
        }

        if let Some(needle) = &self.ref_num_contains {
            match &job.ref_num {
                Some(ref_num) if contains_ignore_case(ref_num, needle) => {}
                _ => return false,
            }
        }

        if self.executed_from.is_some() || self.executed_to.is_some() {
            let Some(executed) = job.executed_at.map(|at| at.date_naive()) else {
                return false;
            };
            if self.executed_from.is_some_and(|from| executed < from) {
                return false;
            }
            if self.executed_to.is_some_and(|to| executed > to) {
                return false;
            }
        }

        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Display order
///
/// Each key has a fixed direction: most recent and most retried first,
/// client names and ids in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ExecutedDateTime,
    ClientName,
    JobId,
    RetryCount,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::ExecutedDateTime,
        SortKey::ClientName,
        SortKey::JobId,
        SortKey::RetryCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ExecutedDateTime => "executed_date_time",
            SortKey::ClientName => "client_name",
            SortKey::JobId => "job_id",
            SortKey::RetryCount => "retry_count",
        }
    }

    /// Human-readable label used by the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::ExecutedDateTime => "Executed Datetime",
            SortKey::ClientName => "Client Name",
            SortKey::JobId => "Job ID",
            SortKey::RetryCount => "Retry Count",
        }
    }

    /// Compare two records in this key's display direction
    ///
    /// Records without an execution time sort after all timestamped ones.
    pub fn compare(&self, a: &JobRecord, b: &JobRecord) -> Ordering {
        match self {
            SortKey::ExecutedDateTime => match (a.executed_at, b.executed_at) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::ClientName => a.client.cmp(&b.client),
            SortKey::JobId => a.job_id.cmp(&b.job_id),
            SortKey::RetryCount => b.retry_count.cmp(&a.retry_count),
        }
    }

    /// Stable sort in place; ties keep their current order
    pub fn sort(&self, jobs: &mut [JobRecord]) {
        jobs.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a sort key string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    /// Accepts the snake_case wire names and the column names
    /// ("ExecutedDateTime", "Client Name", "JobID", ...), ignoring case,
    /// spaces and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "executeddatetime" | "executedat" | "executed" => Ok(SortKey::ExecutedDateTime),
            "clientname" | "client" => Ok(SortKey::ClientName),
            "jobid" | "id" => Ok(SortKey::JobId),
            "retrycount" | "retries" => Ok(SortKey::RetryCount),
            _ => Err(ParseSortKeyError(s.to_string())),
        }
    }
}
