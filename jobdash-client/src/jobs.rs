//! Job endpoints

use jobdash_core::domain::job::JobRecord;
use jobdash_core::dto::job::{CreateJob, JobOptions, JobQuery, RetryJob};

use crate::DashboardClient;
use crate::error::Result;

impl DashboardClient {
    /// List jobs matching `query`, in the order the server sorted them
    pub async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<JobRecord>> {
        let response = self
            .client
            .get(self.url("/jobs"))
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Add a job; the server allocates an id when `req.job_id` is `None`
    pub async fn add_job(&self, req: &CreateJob) -> Result<JobRecord> {
        let response = self
            .client
            .post(self.url("/jobs"))
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Retry a job, optionally recording a message instead of the default one
    pub async fn retry_job(&self, job_id: i64, message: Option<String>) -> Result<JobRecord> {
        let response = self
            .client
            .post(self.url(&format!("/jobs/{}/retry", job_id)))
            .json(&RetryJob { message })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Distinct clients and statuses currently on the board
    pub async fn job_options(&self) -> Result<JobOptions> {
        let response = self.client.get(self.url("/jobs/options")).send().await?;

        self.handle_response(response).await
    }
}
