// src/api/cvs.rs
use serde_json::Value;
use std::path::Path;

use crate::core::ApiClient;
use crate::error::Result;
use crate::types::CvRecord;
use crate::utils::path_segment;

const CVS_ENDPOINT: &str = "/cvs";

/// Stored CV documents
pub struct CvsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn cvs(&self) -> CvsApi<'_> {
        CvsApi { client: self }
    }
}

impl<'a> CvsApi<'a> {
    fn url(&self, id: Option<&str>) -> Result<String> {
        Ok(match id {
            Some(id) => self
                .client
                .gateway_url(&format!("{}/{}", CVS_ENDPOINT, path_segment(id)?)),
            None => self.client.gateway_url(CVS_ENDPOINT),
        })
    }

    pub async fn list(&self) -> Result<Vec<CvRecord>> {
        self.client
            .get_json(&self.url(None)?, "Failed to fetch CVs")
            .await
    }

    pub async fn upload(&self, file_path: &Path) -> Result<Value> {
        let form = self.client.file_form(file_path, "file").await?;
        self.client
            .post_multipart(&self.url(None)?, form, "Upload failed")
            .await
    }

    pub async fn get(&self, cv_id: &str) -> Result<Value> {
        self.client
            .get_json(&self.url(Some(cv_id))?, "Failed to fetch CV")
            .await
    }

    pub async fn update(&self, cv_id: &str, data: &Value) -> Result<Value> {
        self.client
            .put_json(&self.url(Some(cv_id))?, data, "Failed to update CV")
            .await
    }

    pub async fn delete(&self, cv_id: &str) -> Result<Value> {
        self.client
            .delete_json(&self.url(Some(cv_id))?, "Failed to delete CV")
            .await
    }

    /// The gateway currently answers with JSON rather than a document blob.
    pub async fn download(&self, cv_id: &str) -> Result<Value> {
        let url = format!("{}/download", self.url(Some(cv_id))?);
        self.client.get_json(&url, "Failed to download CV").await
    }

    pub async fn previous_cvs(&self) -> Result<Value> {
        self.client
            .get_json(
                &self.client.gateway_url("/mega-cv/previous-cvs"),
                "Failed to fetch previous CVs",
            )
            .await
    }
}
