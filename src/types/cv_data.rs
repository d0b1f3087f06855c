// src/types/cv_data.rs
//! CV workflow transport shapes: session, preview, generate, update.
//!
//! CV sections are loosely typed key/value groups owned by the backend, so
//! they stay `serde_json` maps and are read through accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{list_field, object_field, str_field, text_list, JsonObject};

// ===== Session =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl StartSessionResponse {
    pub fn status(&self) -> Option<&str> {
        str_field(&self.extra, "status")
    }

    pub fn message(&self) -> Option<&str> {
        str_field(&self.extra, "message")
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        str_field(&self.extra, "expires_at")
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndSessionResponse {
    pub fields: JsonObject,
}

impl EndSessionResponse {
    pub fn session_id(&self) -> Option<&str> {
        str_field(&self.fields, "session_id")
    }

    pub fn status(&self) -> Option<&str> {
        str_field(&self.fields, "status")
    }

    /// Whether the backend removed the uploaded CV file with the session.
    pub fn file_cleaned(&self) -> Option<bool> {
        self.fields.get("file_cleaned").and_then(Value::as_bool)
    }

    pub fn message(&self) -> Option<&str> {
        str_field(&self.fields, "message")
    }
}

// ===== Preview =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvPreviewRequest {
    pub session_id: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvPreviewResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl CvPreviewResponse {
    pub fn job_analysis(&self) -> Option<&JsonObject> {
        object_field(&self.extra, "job_analysis")
    }

    pub fn profile_match(&self) -> Option<&JsonObject> {
        object_field(&self.extra, "profile_match")
    }

    pub fn keyword_coverage(&self) -> Option<&JsonObject> {
        object_field(&self.extra, "keyword_coverage")
    }

    pub fn job_keywords(&self) -> Vec<&str> {
        self.job_analysis()
            .map(|analysis| text_list(analysis, "keywords"))
            .unwrap_or_default()
    }

    pub fn strengths(&self) -> Vec<&str> {
        self.profile_match()
            .map(|m| text_list(m, "strengths"))
            .unwrap_or_default()
    }

    pub fn gaps(&self) -> Vec<&str> {
        self.profile_match()
            .map(|m| text_list(m, "gaps"))
            .unwrap_or_default()
    }

    /// Match score as a float, whether the backend sent an integer or not.
    pub fn match_score(&self) -> Option<f64> {
        self.profile_match()
            .and_then(|m| m.get("match_score"))
            .and_then(Value::as_f64)
    }

    pub fn keywords_present(&self) -> Vec<&str> {
        self.keyword_coverage()
            .map(|c| text_list(c, "present_in_profile"))
            .unwrap_or_default()
    }

    pub fn keywords_missing(&self) -> Vec<&str> {
        self.keyword_coverage()
            .map(|c| text_list(c, "missing_from_profile"))
            .unwrap_or_default()
    }

    pub fn preview_ready(&self) -> bool {
        self.extra
            .get("preview_ready")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn generation_method(&self) -> Option<&str> {
        str_field(&self.extra, "generation_method")
    }

    /// Share of extracted keywords already evidenced in the profile, 0..=100.
    pub fn keyword_coverage_percent(&self) -> u8 {
        let present = self.keywords_present().len();
        let total = present + self.keywords_missing().len();
        if total == 0 {
            return 0;
        }
        ((present * 100) / total) as u8
    }
}

// ===== Generate =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvGenerateRequest {
    pub session_id: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
}

/// A CV document: named sections of backend-defined shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CvObject {
    pub fields: JsonObject,
}

impl CvObject {
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn personal_information(&self) -> Option<&JsonObject> {
        object_field(&self.fields, "personal_information")
    }

    pub fn professional_summary(&self) -> Option<&JsonObject> {
        object_field(&self.fields, "professional_summary")
    }

    pub fn work_experience(&self) -> &[Value] {
        list_field(&self.fields, "work_experience")
    }

    pub fn education(&self) -> &[Value] {
        list_field(&self.fields, "education")
    }

    pub fn skills(&self) -> Option<&JsonObject> {
        object_field(&self.fields, "skills")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvGenerateResponse {
    pub session_id: String,
    pub cv: CvObject,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl CvGenerateResponse {
    pub fn cover_letter(&self) -> Option<&JsonObject> {
        object_field(&self.extra, "cover_letter")
    }

    pub fn cover_letter_text(&self) -> Option<&str> {
        self.cover_letter().and_then(|letter| str_field(letter, "content"))
    }

    pub fn generation_method(&self) -> Option<&str> {
        str_field(&self.extra, "generation_method")
    }
}

// ===== Update =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvUpdateRequest {
    pub session_id: String,
    #[serde(rename = "currentCV")]
    pub current_cv: CvObject,
    #[serde(rename = "updateRequest")]
    pub update_request: String,
    #[serde(rename = "jobDescription", skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

/// Keys the update endpoint adds next to the revised CV sections.
const UPDATE_METADATA: [&str; 3] = ["generation_method", "update_request", "updated_at"];

/// The updated CV comes back flattened alongside the update metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvUpdateResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub body: CvObject,
}

impl CvUpdateResponse {
    /// The revised CV without the update metadata, ready for another revision.
    pub fn revised_cv(&self) -> CvObject {
        let fields = self
            .body
            .fields
            .iter()
            .filter(|(key, _)| !UPDATE_METADATA.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        CvObject { fields }
    }

    pub fn generation_method(&self) -> Option<&str> {
        str_field(&self.body.fields, "generation_method")
    }

    pub fn update_request(&self) -> Option<&str> {
        str_field(&self.body.fields, "update_request")
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.body.fields.get("updated_at").and_then(Value::as_i64)
    }
}
