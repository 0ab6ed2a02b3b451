//! Jobdash HTTP Client
//!
//! A small, type-safe HTTP client for the Jobdash server's JSON API, used by
//! the CLI and by integration tests.
//!
//! # Example
//!
//! ```no_run
//! use jobdash_client::DashboardClient;
//! use jobdash_core::dto::job::{CreateJob, JobQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DashboardClient::new("http://localhost:8080");
//!
//!     let job = client.add_job(&CreateJob {
//!         client: "Acme".to_string(),
//!         job_id: None,
//!         job_name: "Cost Metrics Scan".to_string(),
//!         parameters: "-k eastus, -t 80%".to_string(),
//!     }).await?;
//!
//!     let jobs = client.list_jobs(&JobQuery::default().with_client("Acme")).await?;
//!     println!("Added job {}, {} job(s) for Acme", job.job_id, jobs.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// HTTP client for the Jobdash JSON API
///
/// Covers listing (with filters and sort), adding and retrying jobs, and
/// fetching the filter options.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: String,
    client: Client,
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl DashboardClient {
    /// Create a client for the server at `base_url` (e.g. "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client reusing a configured reqwest `Client`
    /// (timeouts, proxies, TLS settings)
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Check the status code and deserialize the JSON body
    ///
    /// Error bodies of the form `{"error": "..."}` become typed errors:
    /// 404 maps to [`ClientError::NotFound`], 400 to [`ClientError::InvalidRequest`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);

            tracing::debug!("Request failed with {}: {}", status, message);

            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST => ClientError::InvalidRequest(message),
                _ => ClientError::api_error(status.as_u16(), message),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
