// src/api/career_ark.rs
//! Career Ark: CV import tasks and the persistent profile sections

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::core::ApiClient;
use crate::error::{ApiError, Result};
use crate::types::{
    AllSections, ArkProfile, GenerateMaterialsRequest, SectionKind, TaskStatus, UploadAccepted,
};
use crate::utils::{path_segment, require_non_blank};

const UPLOAD_ENDPOINT: &str = "/api/career-ark/cv";
const PROFILES_ENDPOINT: &str = "/api/career-ark/profiles";

#[derive(Clone, Copy)]
pub struct CareerArkApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn career_ark(&self) -> CareerArkApi<'_> {
        CareerArkApi { client: self }
    }
}

impl<'a> CareerArkApi<'a> {
    pub async fn health(&self) -> Result<Value> {
        self.client
            .get_public(&self.client.arc_url("/health"), "Health check failed")
            .await
    }

    /// Upload a CV file for extraction; the backend answers with a task id.
    pub async fn upload_cv(&self, file_path: &Path) -> Result<UploadAccepted> {
        let form = self.client.file_form(file_path, "file").await?;
        info!("Uploading {} to Career Ark", file_path.display());
        self.client
            .post_multipart(
                &self.client.gateway_url(UPLOAD_ENDPOINT),
                form,
                "Upload failed",
            )
            .await
    }

    pub async fn cv_status(&self, task_id: &str) -> Result<TaskStatus> {
        let url = self
            .client
            .arc_url(&format!("/cv/status/{}", path_segment(task_id)?));
        self.client.get_json(&url, "Status check failed").await
    }

    pub async fn profile(&self) -> Result<ArkProfile> {
        self.client
            .get_json(
                &self.client.gateway_url(&format!("{}/me", PROFILES_ENDPOINT)),
                "Failed to fetch profile",
            )
            .await
    }

    /// `fresh` bypasses caches, used right after an import completes.
    pub async fn all_sections(&self, profile_id: &str, fresh: bool) -> Result<AllSections> {
        let url = self.client.gateway_url(&format!(
            "{}/{}/all_sections",
            PROFILES_ENDPOINT,
            path_segment(profile_id)?
        ));
        if fresh {
            self.client
                .get_json_uncached(&url, "Failed to fetch Ark data")
                .await
        } else {
            self.client.get_json(&url, "Failed to fetch Ark data").await
        }
    }

    /// Current user's profile followed by all of its sections.
    pub async fn arc_data(&self) -> Result<AllSections> {
        let profile = self.profile().await?;
        self.all_sections(&profile.id.to_string(), false).await
    }

    pub async fn generate_application_materials(
        &self,
        job_advert: &str,
        arc_data: Value,
    ) -> Result<Value> {
        require_non_blank("job advert", job_advert)?;
        let request = GenerateMaterialsRequest {
            job_advert: job_advert.to_string(),
            arc_data,
        };
        self.client
            .post_json(
                &self.client.arc_url("/generate"),
                &request,
                "Failed to generate application materials",
            )
            .await
    }

    pub async fn delete_cv_task(&self, task_id: &str) -> Result<Value> {
        let url = self
            .client
            .arc_url(&format!("/cv/{}", path_segment(task_id)?));
        self.client
            .delete_json(&url, "Failed to delete CV task")
            .await
    }

    pub async fn list_cv_tasks(&self) -> Result<Value> {
        self.client
            .get_json(&self.client.arc_url("/cv/tasks"), "Failed to list CV tasks")
            .await
    }

    pub async fn download_processed_cv(&self, task_id: &str) -> Result<Vec<u8>> {
        let url = self
            .client
            .arc_url(&format!("/cv/download/{}", path_segment(task_id)?));
        self.client
            .get_bytes(&url, "Failed to download processed CV")
            .await
    }

    pub async fn add_entry<T>(&self, kind: SectionKind, entry: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        ensure_editable(kind)?;
        let context = format!("Failed to add {}", kind.label());
        self.client
            .post_json(&self.client.arc_url(kind.path()), entry, &context)
            .await
    }

    pub async fn update_entry<T>(&self, kind: SectionKind, id: &str, entry: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        ensure_editable(kind)?;
        let url = self
            .client
            .arc_url(&format!("{}/{}", kind.path(), path_segment(id)?));
        let context = format!("Failed to update {}", kind.label());
        self.client.patch_json(&url, entry, &context).await
    }

    pub async fn delete_entry(&self, kind: SectionKind, id: &str) -> Result<Value> {
        let url = self
            .client
            .arc_url(&format!("{}/{}", kind.path(), path_segment(id)?));
        let context = format!("Failed to delete {}", kind.label());
        self.client.delete_json(&url, &context).await
    }
}

fn ensure_editable(kind: SectionKind) -> Result<()> {
    if kind.is_editable() {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "Section {} only supports deletion",
            kind.path()
        )))
    }
}
