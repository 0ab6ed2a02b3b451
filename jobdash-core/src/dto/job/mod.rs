//! Job DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;
use crate::error::BoardError;
use crate::query::{JobFilter, SortKey};

/// Request to add a new job
///
/// Field values are raw form input. When `job_id` is omitted the server
/// allocates the next free id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJob {
    pub client: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub job_name: String,
    /// Comma-separated parameter text
    #[serde(default)]
    pub parameters: String,
}

/// Request to retry a job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Distinct values available for the filter selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    pub clients: Vec<String>,
    pub statuses: Vec<JobStatus>,
}

/// List query as it travels in a URL query string
///
/// Every field is raw text; blank values mean "no constraint" so that an
/// HTML form's "All" option (an empty value) needs no special handling.
/// Use [`JobQuery::resolve`] to turn it into a typed filter and sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl JobQuery {
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_job_name(mut self, needle: impl Into<String>) -> Self {
        self.job_name = Some(needle.into());
        self
    }

    pub fn with_ref_num(mut self, needle: impl Into<String>) -> Self {
        self.ref_num = Some(needle.into());
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from.map(|d| d.format("%Y-%m-%d").to_string());
        self.to = to.map(|d| d.format("%Y-%m-%d").to_string());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort.to_string());
        self
    }

    /// Parse the raw fields into a filter and an optional sort key
    pub fn resolve(&self) -> Result<(JobFilter, Option<SortKey>), BoardError> {
        let status = non_blank(&self.status)
            .map(|s| s.parse::<JobStatus>())
            .transpose()
            .map_err(|e| BoardError::validation(e.to_string()))?;

        let sort = non_blank(&self.sort)
            .map(|s| s.parse::<SortKey>())
            .transpose()
            .map_err(|e| BoardError::validation(e.to_string()))?;

        let filter = JobFilter {
            // Exact match: keep the value untouched apart from the blank check
            client: self
                .client
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            status,
            job_name_contains: non_blank(&self.job_name).map(str::to_string),
            ref_num_contains: non_blank(&self.ref_num).map(str::to_string),
            executed_from: parse_date("from", &self.from)?,
            executed_to: parse_date("to", &self.to)?,
        };

        Ok((filter, sort))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &str, value: &Option<String>) -> Result<Option<NaiveDate>, BoardError> {
    non_blank(value)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                BoardError::validation(format!(
                    "Invalid '{}' date '{}', expected YYYY-MM-DD",
                    field, s
                ))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_is_identity() {
        let query = JobQuery {
            client: Some(String::new()),
            status: Some("  ".to_string()),
            sort: Some(String::new()),
            ..Default::default()
        };

        let (filter, sort) = query.resolve().unwrap();
        assert_eq!(filter, JobFilter::default());
        assert_eq!(sort, None);
    }

    #[test]
    fn test_builder_values_resolve() {
        let from = NaiveDate::from_ymd_opt(2024, 5, 1);
        let query = JobQuery::default()
            .with_client("Acme")
            .with_status(JobStatus::Failed)
            .with_date_range(from, None)
            .with_sort(SortKey::RetryCount);

        let (filter, sort) = query.resolve().unwrap();
        assert_eq!(filter.client.as_deref(), Some("Acme"));
        assert_eq!(filter.status, Some(JobStatus::Failed));
        assert_eq!(filter.executed_from, from);
        assert_eq!(sort, Some(SortKey::RetryCount));
    }

    #[test]
    fn test_invalid_values_are_validation_errors() {
        let bad_status = JobQuery {
            status: Some("Exploded".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_status.resolve(), Err(BoardError::Validation(_))));

        let bad_date = JobQuery {
            to: Some("31/12/2024".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_date.resolve(), Err(BoardError::Validation(_))));
    }

    #[test]
    fn test_create_job_accepts_missing_optional_fields() {
        let req: CreateJob =
            serde_json::from_str(r#"{"client":"Acme","job_name":"Scan"}"#).unwrap();
        assert_eq!(req.job_id, None);
        assert_eq!(req.parameters, "");
    }
}
