// src/api/ai.rs
use serde_json::Value;

use crate::core::ApiClient;
use crate::error::Result;
use crate::types::{AnalyzeCvRequest, CoverLetterRequest, KeywordsRequest, OptimizeCvRequest};
use crate::utils::require_non_blank;

pub struct AiApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn ai(&self) -> AiApi<'_> {
        AiApi { client: self }
    }
}

impl<'a> AiApi<'a> {
    pub async fn optimize_cv(&self, request: &OptimizeCvRequest) -> Result<Value> {
        require_non_blank("cv_id", &request.cv_id)?;
        self.client
            .post_json(
                &self.client.ai_url("/optimize-cv"),
                request,
                "Failed to optimize CV",
            )
            .await
    }

    pub async fn generate_cover_letter(&self, request: &CoverLetterRequest) -> Result<Value> {
        require_non_blank("cv_id", &request.cv_id)?;
        require_non_blank("job description", &request.job_description)?;
        self.client
            .post_json(
                &self.client.ai_url("/generate-cover-letter"),
                request,
                "Failed to generate cover letter",
            )
            .await
    }

    pub async fn analyze_cv(&self, request: &AnalyzeCvRequest) -> Result<Value> {
        require_non_blank("cv_id", &request.cv_id)?;
        self.client
            .post_json(&self.client.ai_url("/analyze"), request, "Failed to analyze CV")
            .await
    }

    /// Keyword extraction lives on the Arc service, not the AI one.
    pub async fn extract_keywords(&self, job_description: &str) -> Result<Value> {
        require_non_blank("job description", job_description)?;
        let request = KeywordsRequest {
            job_description: job_description.to_string(),
        };
        self.client
            .post_json(
                &self.client.arc_url("/ai/keywords"),
                &request,
                "Failed to fetch keywords",
            )
            .await
    }
}
