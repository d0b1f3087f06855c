// src/api/applications.rs
use crate::core::ApiClient;
use crate::error::Result;
use crate::types::ApplicationRecord;
use crate::utils::path_segment;

pub struct ApplicationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn applications(&self) -> ApplicationsApi<'_> {
        ApplicationsApi { client: self }
    }
}

impl<'a> ApplicationsApi<'a> {
    pub async fn history(&self) -> Result<Vec<ApplicationRecord>> {
        self.client
            .get_json(
                &self.client.gateway_url("/api/applications/history"),
                "Failed to fetch application history",
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Result<ApplicationRecord> {
        let url = self
            .client
            .gateway_url(&format!("/api/applications/{}", path_segment(id)?));
        self.client
            .get_json(&url, "Failed to fetch application details")
            .await
    }
}
