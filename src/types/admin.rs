// src/types/admin.rs
//! Admin console shapes: analytics, user records and credit adjustments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{list_field, str_field, Id, JsonObject};

/// Aggregate counters; every field is a backend-defined number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyticsSummary {
    pub fields: JsonObject,
}

impl AnalyticsSummary {
    pub fn counter(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    pub fn total_users(&self) -> Option<i64> {
        self.counter("total_users")
    }

    pub fn active_users_7d(&self) -> Option<i64> {
        self.counter("active_users_7d")
    }

    pub fn total_cvs_generated(&self) -> Option<i64> {
        self.counter("total_cvs_generated")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserListQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl UserListQuery {
    pub fn page(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit,
            search: None,
        }
    }

    pub fn search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }
}

/// One user as listed or detailed in the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Id,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl AdminUser {
    pub fn email(&self) -> Option<&str> {
        str_field(&self.extra, "email")
    }

    pub fn name(&self) -> Option<&str> {
        str_field(&self.extra, "name")
    }

    pub fn subscription_type(&self) -> Option<&str> {
        str_field(&self.extra, "subscription_type")
    }

    pub fn monthly_credits_remaining(&self) -> Option<i64> {
        self.extra
            .get("monthly_credits_remaining")
            .and_then(Value::as_i64)
    }

    pub fn topup_credits(&self) -> Option<i64> {
        self.extra.get("topup_credits").and_then(Value::as_i64)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum CreditReason {
    Refund,
    Promo,
    Support,
    Correction,
    Violation,
}

impl fmt::Display for CreditReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreditReason::Refund => "Refund",
            CreditReason::Promo => "Promo",
            CreditReason::Support => "Support",
            CreditReason::Correction => "Correction",
            CreditReason::Violation => "Violation",
        };
        write!(f, "{}", name)
    }
}

/// Signed credit change: positive grants, negative deducts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAdjustment {
    pub amount: i64,
    pub reason: CreditReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: Id,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl CreditTransaction {
    pub fn amount(&self) -> Option<i64> {
        self.extra.get("amount").and_then(Value::as_i64)
    }

    pub fn reason(&self) -> Option<&str> {
        str_field(&self.extra, "reason")
    }

    pub fn balance_after(&self) -> Option<i64> {
        self.extra.get("balance_after").and_then(Value::as_i64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserActivity {
    pub fields: JsonObject,
}

impl UserActivity {
    pub fn cvs(&self) -> &[Value] {
        list_field(&self.fields, "cvs")
    }

    pub fn applications(&self) -> &[Value] {
        list_field(&self.fields, "applications")
    }

    pub fn cvs_count(&self) -> usize {
        self.fields
            .get("cvs_count")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or_else(|| self.cvs().len())
    }

    pub fn applications_count(&self) -> usize {
        self.fields
            .get("applications_count")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or_else(|| self.applications().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adjustment_wire_shape() {
        let adj = CreditAdjustment {
            amount: -5,
            reason: CreditReason::Violation,
            notes: None,
        };
        assert_eq!(
            serde_json::to_value(&adj).unwrap(),
            json!({"amount": -5, "reason": "Violation"})
        );
    }

    #[test]
    fn test_user_list_query_drops_blank_search() {
        let query = UserListQuery::page(0, 50).search("   ");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"skip": 0, "limit": 50})
        );
        let query = UserListQuery::page(50, 50).search(" ada ");
        assert_eq!(query.search.as_deref(), Some("ada"));
    }

    #[test]
    fn test_activity_counts_fall_back_to_lists() {
        let activity: UserActivity = serde_json::from_value(json!({
            "user_id": "u-1",
            "cvs": [{"id": "c1"}, {"id": "c2"}],
            "applications": null,
            "applications_count": 4
        }))
        .unwrap();
        assert_eq!(activity.cvs_count(), 2);
        assert_eq!(activity.applications_count(), 4);
        assert!(activity.applications().is_empty());
    }

    #[test]
    fn test_admin_user_round_trips() {
        let raw = json!({
            "id": "u-1",
            "email": "ada@example.com",
            "name": null,
            "monthly_credits_remaining": 20,
            "last_monthly_reset": null
        });
        let user: AdminUser = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.name(), None);
        assert_eq!(user.monthly_credits_remaining(), Some(20));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }
}
