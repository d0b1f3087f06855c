// src/api/feedback.rs
use serde_json::Value;

use crate::core::ApiClient;
use crate::error::Result;
use crate::types::Feedback;
use crate::utils::require_non_blank;

pub struct FeedbackApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn feedback(&self) -> FeedbackApi<'_> {
        FeedbackApi { client: self }
    }
}

impl<'a> FeedbackApi<'a> {
    pub async fn submit(&self, feedback: &Feedback) -> Result<Value> {
        require_non_blank("message", &feedback.message)?;
        self.client
            .post_json(
                &self.client.gateway_url("/api/feedback"),
                feedback,
                "Failed to submit feedback",
            )
            .await
    }
}
