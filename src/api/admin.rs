// src/api/admin.rs
//! Admin console: platform analytics, user lookup and manual credit
//! adjustments. Calls are refused locally unless the session token carries
//! admin rights; the gateway enforces the same rule.

use serde_json::Value;
use tracing::{info, warn};

use crate::auth::decode_claims;
use crate::core::ApiClient;
use crate::error::{ApiError, Result};
use crate::types::{
    AdminUser, AllSections, AnalyticsSummary, CreditAdjustment, CreditTransaction, UserActivity,
    UserListQuery,
};
use crate::utils::path_segment;

const ADMIN_BASE: &str = "/api/admin";

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi { client: self }
    }
}

impl<'a> AdminApi<'a> {
    fn url(&self, path: &str) -> String {
        self.client.gateway_url(&format!("{}/{}", ADMIN_BASE, path))
    }

    fn user_url(&self, user_id: &str, tail: &str) -> Result<String> {
        let mut path = format!("users/{}", path_segment(user_id)?);
        if !tail.is_empty() {
            path.push('/');
            path.push_str(tail);
        }
        Ok(self.url(&path))
    }

    /// Expired or missing sessions surface as `SessionExpired`; a live
    /// session without admin rights is rejected before any request.
    fn require_admin(&self) -> Result<()> {
        let token = self.client.auth().require_session()?;
        let claims = decode_claims(&token)?;
        if claims.is_admin() {
            return Ok(());
        }
        warn!("Admin call refused for user {:?}", claims.user_id());
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }

    pub async fn analytics(&self) -> Result<AnalyticsSummary> {
        self.require_admin()?;
        self.client
            .get_json(&self.url("analytics/summary"), "Failed to fetch analytics")
            .await
    }

    pub async fn list_users(&self, query: &UserListQuery) -> Result<Vec<AdminUser>> {
        self.require_admin()?;
        self.client
            .get_json_query(&self.url("users/"), query, "Failed to fetch users")
            .await
    }

    pub async fn user_detail(&self, user_id: &str) -> Result<AdminUser> {
        self.require_admin()?;
        self.client
            .get_json(&self.user_url(user_id, "")?, "Failed to fetch user detail")
            .await
    }

    /// Grant (positive) or deduct (negative) credits with an audit reason.
    pub async fn adjust_credits(
        &self,
        user_id: &str,
        adjustment: &CreditAdjustment,
    ) -> Result<Value> {
        if adjustment.amount == 0 {
            return Err(ApiError::InvalidInput("amount must not be zero".to_string()));
        }
        self.require_admin()?;

        let result = self
            .client
            .post_json(
                &self.user_url(user_id, "credits")?,
                adjustment,
                "Failed to adjust credits",
            )
            .await?;
        info!(
            "Adjusted credits for {} by {} ({})",
            user_id, adjustment.amount, adjustment.reason
        );
        Ok(result)
    }

    pub async fn credit_history(&self, user_id: &str) -> Result<Vec<CreditTransaction>> {
        self.require_admin()?;
        self.client
            .get_json(
                &self.user_url(user_id, "credits/history")?,
                "Failed to fetch credit history",
            )
            .await
    }

    pub async fn user_activity(&self, user_id: &str) -> Result<UserActivity> {
        self.require_admin()?;
        self.client
            .get_json(
                &self.user_url(user_id, "activity")?,
                "Failed to fetch user activity",
            )
            .await
    }

    /// The user's Career Ark profile, in the same shape as `all_sections`.
    pub async fn user_profile(&self, user_id: &str) -> Result<AllSections> {
        self.require_admin()?;
        self.client
            .get_json(
                &self.user_url(user_id, "profile")?,
                "Failed to fetch user profile",
            )
            .await
    }
}
