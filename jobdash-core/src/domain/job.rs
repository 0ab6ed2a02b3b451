//! Job domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message stored on a job when it is retried without an explicit message
pub const DEFAULT_RETRY_MESSAGE: &str = "Retried";

/// Job record
///
/// One row per job and its latest execution attempt. Shared between the
/// server (persists) and the client/CLI (renders).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub client: String,
    pub job_id: i64,
    pub job_name: String,
    pub parameters: Vec<String>,
    pub status: JobStatus,
    pub message: String,
    pub executed_at: Option<DateTime<Utc>>,
    pub ref_num: Option<String>,
    pub retry_count: u32,
}

impl JobRecord {
    /// Parameters joined the way the dashboard table shows them
    pub fn parameters_display(&self) -> String {
        self.parameters.join(", ")
    }
}

/// Job status
///
/// A plain tagged value: `Running`, `Success` and `Failed` are set by the
/// execution engine, `Retried` by the retry action. No transition table is
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Failed,
    Retried,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Success,
        JobStatus::Failed,
        JobStatus::Retried,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Success => "Success",
            JobStatus::Failed => "Failed",
            JobStatus::Retried => "Retried",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for JobStatus {
    type Err = ParseStatusError;

    /// Case-insensitive. Also accepts the legacy spellings written by older
    /// dashboard deployments ("Retry", "Completed", "Succeeded").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "success" | "succeeded" | "completed" => Ok(JobStatus::Success),
            "failed" => Ok(JobStatus::Failed),
            "retried" | "retry" => Ok(JobStatus::Retried),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Parse comma-separated parameter text
///
/// Each piece is trimmed and empty pieces are dropped; order is preserved.
pub fn parse_parameters(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
