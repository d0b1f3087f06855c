// src/api/profile.rs
//! User profile, password and settings

use serde_json::Value;

use crate::core::ApiClient;
use crate::error::{ApiError, Result};
use crate::types::{PasswordChange, Profile, ProfileUpdate};
use crate::utils::require_non_blank;

const PROFILE_ENDPOINT: &str = "/api/user/profile";
const PASSWORD_ENDPOINT: &str = "/api/user/password";
const SETTINGS_ENDPOINT: &str = "/api/user/settings";

pub struct ProfileApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn profile(&self) -> ProfileApi<'_> {
        ProfileApi { client: self }
    }
}

impl<'a> ProfileApi<'a> {
    pub async fn get(&self) -> Result<Profile> {
        self.client
            .get_json(
                &self.client.gateway_url(PROFILE_ENDPOINT),
                "Failed to fetch profile",
            )
            .await
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<Profile> {
        require_non_blank("name", &update.name)?;
        require_non_blank("email", &update.email)?;
        self.client
            .put_json(
                &self.client.gateway_url(PROFILE_ENDPOINT),
                update,
                "Failed to update profile",
            )
            .await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<Value> {
        require_non_blank("current password", &change.current_password)?;
        require_non_blank("new password", &change.new_password)?;
        if change.current_password == change.new_password {
            return Err(ApiError::InvalidInput(
                "New password must differ from the current one".to_string(),
            ));
        }
        self.client
            .put_json(
                &self.client.gateway_url(PASSWORD_ENDPOINT),
                change,
                "Failed to change password",
            )
            .await
    }

    /// Settings are a free-form object owned by the backend.
    pub async fn settings(&self) -> Result<Value> {
        self.client
            .get_json(
                &self.client.gateway_url(SETTINGS_ENDPOINT),
                "Failed to fetch settings",
            )
            .await
    }

    pub async fn update_settings(&self, settings: &Value) -> Result<Value> {
        if !settings.is_object() {
            return Err(ApiError::InvalidInput(
                "Settings must be a JSON object".to_string(),
            ));
        }
        self.client
            .put_json(
                &self.client.gateway_url(SETTINGS_ENDPOINT),
                settings,
                "Failed to update settings",
            )
            .await
    }
}
