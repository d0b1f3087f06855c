// src/types/records.rs
//! Account, job tracking, feedback and AI request shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{object_field, str_field, Id, JsonObject};

// ===== Auth =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthResponse {
    pub fields: JsonObject,
}

impl AuthResponse {
    /// Session token, if the backend issued a non-blank one.
    pub fn token(&self) -> Option<&str> {
        str_field(&self.fields, "token").filter(|t| !t.trim().is_empty())
    }

    pub fn user(&self) -> Option<&JsonObject> {
        object_field(&self.fields, "user")
    }

    pub fn message(&self) -> Option<&str> {
        str_field(&self.fields, "message")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentUser {
    pub fields: JsonObject,
}

impl CurrentUser {
    pub fn id(&self) -> Option<Id> {
        self.fields
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value(id).ok())
    }

    pub fn email(&self) -> Option<&str> {
        str_field(&self.fields, "email")
    }

    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }
}

/// Authorization code handed back by an OAuth provider's redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthCallback {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SocialProvider {
    Google,
    Facebook,
    Linkedin,
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SocialProvider::Google => "google",
            SocialProvider::Facebook => "facebook",
            SocialProvider::Linkedin => "linkedin",
        };
        write!(f, "{}", name)
    }
}

// ===== Job postings =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobUpdate {
    pub title: String,
    pub company: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Id,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Job {
    pub fn title(&self) -> &str {
        str_field(&self.extra, "title").unwrap_or_default()
    }

    pub fn company(&self) -> &str {
        str_field(&self.extra, "company").unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        str_field(&self.extra, "description").unwrap_or_default()
    }

    pub fn status(&self) -> Option<&str> {
        str_field(&self.extra, "status")
    }
}

// ===== Application history and stored records =====

/// Any backend record keyed by `id` whose remaining fields are opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Id,
    #[serde(flatten)]
    pub extra: JsonObject,
}

pub type ApplicationRecord = Record;
pub type CvRecord = Record;
pub type PaymentMethod = Record;

// ===== Profile and settings =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    pub fields: JsonObject,
}

impl Profile {
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    pub fn email(&self) -> Option<&str> {
        str_field(&self.fields, "email")
    }
}

/// Credit balances shown next to the account menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credits {
    pub fields: JsonObject,
}

impl Credits {
    pub fn daily(&self) -> Option<i64> {
        self.fields.get("daily_credits_remaining").and_then(Value::as_i64)
    }

    pub fn monthly(&self) -> Option<i64> {
        self.fields.get("monthly_credits_remaining").and_then(Value::as_i64)
    }

    pub fn topup(&self) -> Option<i64> {
        self.fields.get("topup_credits_remaining").and_then(Value::as_i64)
    }

    /// Sum of every balance the backend reported.
    pub fn total(&self) -> i64 {
        [self.daily(), self.monthly(), self.topup()]
            .into_iter()
            .flatten()
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// ===== Feedback =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Bug,
    Feature,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ===== AI =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeCvRequest {
    pub cv_id: String,
    pub targets: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverLetterRequest {
    pub cv_id: String,
    pub job_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsRequest {
    #[serde(rename = "jobDescription")]
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeCvRequest {
    pub cv_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
}
