// src/api/jobs.rs
use serde_json::Value;
use tracing::info;

use crate::core::ApiClient;
use crate::error::Result;
use crate::types::{Job, JobUpdate, NewJob};
use crate::utils::{path_segment, require_non_blank};

const JOBS_ENDPOINT: &str = "/api/jobs";

/// Tracked job postings
pub struct JobsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi { client: self }
    }
}

impl<'a> JobsApi<'a> {
    fn job_url(&self, id: &str) -> Result<String> {
        Ok(self
            .client
            .gateway_url(&format!("{}/{}", JOBS_ENDPOINT, path_segment(id)?)))
    }

    pub async fn list(&self) -> Result<Vec<Job>> {
        self.client
            .get_json(&self.client.gateway_url(JOBS_ENDPOINT), "Failed to fetch jobs")
            .await
    }

    pub async fn create(&self, job: &NewJob) -> Result<Job> {
        require_non_blank("title", &job.title)?;
        require_non_blank("company", &job.company)?;
        require_non_blank("description", &job.description)?;

        let created: Job = self
            .client
            .post_json(
                &self.client.gateway_url(JOBS_ENDPOINT),
                job,
                "Failed to create job",
            )
            .await?;
        info!("Created job {} ({} at {})", created.id, job.title, job.company);
        Ok(created)
    }

    pub async fn update(&self, id: &str, job: &JobUpdate) -> Result<Job> {
        require_non_blank("title", &job.title)?;
        require_non_blank("company", &job.company)?;
        require_non_blank("description", &job.description)?;
        require_non_blank("status", &job.status)?;

        self.client
            .put_json(&self.job_url(id)?, job, "Failed to update job")
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .delete_json(&self.job_url(id)?, "Failed to delete job")
            .await
    }
}
