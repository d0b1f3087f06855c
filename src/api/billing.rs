// src/api/billing.rs
//! Subscription and payment-method reads and actions

use serde_json::Value;

use crate::core::ApiClient;
use crate::error::Result;
use crate::types::PaymentMethod;
use crate::utils::path_segment;

pub struct BillingApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn billing(&self) -> BillingApi<'_> {
        BillingApi { client: self }
    }
}

impl<'a> BillingApi<'a> {
    fn url(&self, path: &str, id: &str) -> Result<String> {
        Ok(self
            .client
            .gateway_url(&format!("{}/{}", path, path_segment(id)?)))
    }

    pub async fn subscription(&self, user_id: &str) -> Result<Value> {
        self.client
            .get_json(
                &self.url("/api/subscriptions/user", user_id)?,
                "Failed to fetch subscription",
            )
            .await
    }

    pub async fn cancel_subscription(&self, subscription_id: &str) -> Result<Value> {
        self.client
            .post_empty(
                &self.url("/api/subscriptions/cancel", subscription_id)?,
                "Failed to cancel subscription",
            )
            .await
    }

    pub async fn payment_methods(&self, user_id: &str) -> Result<Vec<PaymentMethod>> {
        self.client
            .get_json(
                &self.url("/api/payments/methods", user_id)?,
                "Failed to fetch payment methods",
            )
            .await
    }

    pub async fn payment_history(&self, user_id: &str) -> Result<Value> {
        self.client
            .get_json(
                &self.url("/api/payments/history", user_id)?,
                "Failed to fetch payment history",
            )
            .await
    }

    pub async fn add_payment_method(&self) -> Result<Value> {
        self.client
            .post_empty(
                &self.client.gateway_url("/api/payments/methods/add"),
                "Failed to add payment method",
            )
            .await
    }

    pub async fn delete_payment_method(&self, method_id: &str) -> Result<Value> {
        self.client
            .delete_json(
                &self.url("/api/payments/methods", method_id)?,
                "Failed to delete payment method",
            )
            .await
    }

    pub async fn set_default_payment_method(&self, method_id: &str) -> Result<Value> {
        let url = format!("{}/default", self.url("/api/payments/methods", method_id)?);
        self.client
            .post_empty(&url, "Failed to set default payment method")
            .await
    }
}
