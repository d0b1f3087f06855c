// src/api/cv_workflow.rs
//! Tailoring sessions: start, preview against a job description, generate
//! the CV and cover letter, request revisions, end.

use tracing::{debug, info};

use crate::auth::user_id_from_token;
use crate::core::ApiClient;
use crate::error::{ApiError, Result};
use crate::types::{
    CvGenerateRequest, CvGenerateResponse, CvObject, CvPreviewRequest, CvPreviewResponse,
    CvUpdateRequest, CvUpdateResponse, EndSessionRequest, EndSessionResponse,
    StartSessionRequest, StartSessionResponse,
};
use crate::utils::require_non_blank;

const WORKFLOW_BASE: &str = "/api/v1/cv";

#[derive(Clone, Copy)]
pub struct CvWorkflowApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn cv_workflow(&self) -> CvWorkflowApi<'_> {
        CvWorkflowApi { client: self }
    }
}

impl<'a> CvWorkflowApi<'a> {
    fn url(&self, path: &str) -> String {
        self.client
            .gateway_url(&format!("{}/{}", WORKFLOW_BASE, path))
    }

    pub async fn start_session(&self, user_id: &str) -> Result<StartSessionResponse> {
        require_non_blank("user_id", user_id)?;
        let request = StartSessionRequest {
            user_id: user_id.to_string(),
        };
        let response: StartSessionResponse = self
            .client
            .post_json(&self.url("session/start"), &request, "Failed to start session")
            .await?;
        info!("Started CV session {}", response.session_id);
        Ok(response)
    }

    pub async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse> {
        require_non_blank("session_id", session_id)?;
        let request = EndSessionRequest {
            session_id: session_id.to_string(),
        };
        self.client
            .post_json(&self.url("session/end"), &request, "Failed to end session")
            .await
    }

    pub async fn preview(
        &self,
        session_id: &str,
        job_description: &str,
    ) -> Result<CvPreviewResponse> {
        require_non_blank("session_id", session_id)?;
        require_non_blank("job description", job_description)?;
        let request = CvPreviewRequest {
            session_id: session_id.to_string(),
            job_description: job_description.to_string(),
        };
        self.client
            .post_json(&self.url("preview"), &request, "Failed to preview CV")
            .await
    }

    pub async fn generate(
        &self,
        session_id: &str,
        job_description: &str,
    ) -> Result<CvGenerateResponse> {
        require_non_blank("session_id", session_id)?;
        require_non_blank("job description", job_description)?;
        let request = CvGenerateRequest {
            session_id: session_id.to_string(),
            job_description: job_description.to_string(),
        };
        self.client
            .post_json(&self.url("generate"), &request, "Failed to generate CV")
            .await
    }

    pub async fn update(&self, request: &CvUpdateRequest) -> Result<CvUpdateResponse> {
        require_non_blank("session_id", &request.session_id)?;
        require_non_blank("update request", &request.update_request)?;
        self.client
            .post_json(&self.url("update"), request, "Failed to update CV")
            .await
    }
}

/// Holds the id of the tailoring session currently open, if any.
pub struct CvSession<'a> {
    client: &'a ApiClient,
    api: CvWorkflowApi<'a>,
    session_id: Option<String>,
}

impl<'a> CvSession<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            api: client.cv_workflow(),
            session_id: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub async fn start(&mut self, user_id: &str) -> Result<&str> {
        let response = self.api.start_session(user_id).await?;
        Ok(self.session_id.insert(response.session_id).as_str())
    }

    /// Start a session for the user named in the stored token.
    pub async fn start_for_current_user(&mut self) -> Result<&str> {
        let token = self.client.auth().require_session()?;
        let user_id = user_id_from_token(&token).ok_or_else(|| {
            ApiError::InvalidInput("Session token carries no user id".to_string())
        })?;
        self.start(&user_id).await
    }

    fn active(&self) -> Result<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| ApiError::InvalidInput("No active CV session".to_string()))
    }

    pub async fn preview(&self, job_description: &str) -> Result<CvPreviewResponse> {
        self.api.preview(self.active()?, job_description).await
    }

    pub async fn generate(&self, job_description: &str) -> Result<CvGenerateResponse> {
        self.api.generate(self.active()?, job_description).await
    }

    pub async fn revise(
        &self,
        current_cv: &CvObject,
        update_request: &str,
        job_description: Option<&str>,
    ) -> Result<CvUpdateResponse> {
        let request = CvUpdateRequest {
            session_id: self.active()?.to_string(),
            current_cv: current_cv.clone(),
            update_request: update_request.to_string(),
            job_description: job_description.map(str::to_string),
        };
        self.api.update(&request).await
    }

    /// End the session if one is open. The id is kept when the call fails
    /// so it can be retried.
    pub async fn end(&mut self) -> Result<Option<EndSessionResponse>> {
        let Some(session_id) = self.session_id.clone() else {
            debug!("No CV session to end");
            return Ok(None);
        };
        let response = self.api.end_session(&session_id).await?;
        self.session_id = None;
        Ok(Some(response))
    }
}
