// src/api/credits.rs
use crate::core::ApiClient;
use crate::error::Result;
use crate::types::Credits;

const CREDITS_ENDPOINT: &str = "/api/user/credits";

pub struct CreditsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn credits(&self) -> CreditsApi<'_> {
        CreditsApi { client: self }
    }
}

impl<'a> CreditsApi<'a> {
    /// Remaining daily, monthly and top-up credits for the signed-in user.
    pub async fn balance(&self) -> Result<Credits> {
        self.client
            .get_json(
                &self.client.gateway_url(CREDITS_ENDPOINT),
                "Failed to fetch credits",
            )
            .await
    }
}
