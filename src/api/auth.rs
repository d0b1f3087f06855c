// src/api/auth.rs
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::core::ApiClient;
use crate::error::Result;
use crate::types::{
    AuthResponse, CurrentUser, LoginRequest, OAuthCallback, RegisterRequest, SocialProvider,
};
use crate::utils::require_non_blank;

const AUTH_BASE: &str = "/api/auth";

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn accounts(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl<'a> AuthApi<'a> {
    fn url(&self, path: &str) -> String {
        self.client.gateway_url(&format!("{}/{}", AUTH_BASE, path))
    }

    /// Register; a returned token is stored as the active session.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        require_non_blank("email", &request.email)?;
        require_non_blank("password", &request.password)?;

        let response: AuthResponse = self
            .client
            .post_public(&self.url("register"), request, "Registration failed")
            .await?;
        self.remember(&response)?;
        Ok(response)
    }

    /// Log in and store the returned token.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        require_non_blank("email", &request.email)?;
        require_non_blank("password", &request.password)?;

        let response: AuthResponse = self
            .client
            .post_public(&self.url("login"), request, "Login failed")
            .await?;
        self.remember(&response)?;
        info!("Logged in as {}", request.email);
        Ok(response)
    }

    /// Log out. The local token is dropped whether or not the gateway call
    /// succeeds; an already expired session counts as logged out.
    pub async fn logout(&self) -> Result<Value> {
        let result = self
            .client
            .post_empty::<Value>(&self.url("logout"), "Logout failed")
            .await;
        self.client.token_store().clear()?;

        match result {
            Err(e) if e.is_session_expired() => {
                info!("Session already expired, local token cleared");
                Ok(Value::Null)
            }
            Err(e) => {
                warn!("Logout call failed, local session cleared anyway: {}", e);
                Err(e)
            }
            ok => ok,
        }
    }

    pub async fn current_user(&self) -> Result<CurrentUser> {
        self.client
            .get_json(
                &self.client.gateway_url("/users/me"),
                "Failed to fetch current user",
            )
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Value> {
        require_non_blank("email", email)?;
        self.client
            .post_public(
                &self.url("forgot-password"),
                &json!({ "email": email }),
                "Password reset request failed",
            )
            .await
    }

    pub async fn reset_password(&self, reset_token: &str, password: &str) -> Result<Value> {
        require_non_blank("token", reset_token)?;
        require_non_blank("password", password)?;
        self.client
            .post_public(
                &self.url("reset-password"),
                &json!({ "token": reset_token, "password": password }),
                "Password reset failed",
            )
            .await
    }

    /// Where the browser goes to start an OAuth login.
    pub fn social_auth_url(&self, provider: SocialProvider) -> String {
        self.url(&provider.to_string())
    }

    /// Finish an OAuth login with the code the provider redirected back
    /// with. LinkedIn also needs the `state` it was started with.
    pub async fn oauth_callback(
        &self,
        provider: SocialProvider,
        callback: &OAuthCallback,
    ) -> Result<AuthResponse> {
        require_non_blank("code", &callback.code)?;
        if provider == SocialProvider::Linkedin {
            require_non_blank("state", callback.state.as_deref().unwrap_or_default())?;
        }

        let response: AuthResponse = self
            .client
            .post_public(
                &self.url(&format!("{}/callback", provider)),
                callback,
                "OAuth callback failed",
            )
            .await?;
        self.remember(&response)?;
        info!("Completed {} sign-in", provider);
        Ok(response)
    }

    fn remember(&self, response: &AuthResponse) -> Result<()> {
        if let Some(token) = response.token() {
            self.client.token_store().set(token)?;
        }
        Ok(())
    }
}
