// src/types/career_ark.rs
//! Career Ark shapes: CV import tasks and the persistent profile sections.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{list_field, str_field, Id, JsonObject};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAccepted {
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl ImportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "queued" => ImportStatus::Pending,
            "processing" | "in_progress" | "running" => ImportStatus::Processing,
            "completed" | "complete" | "done" => ImportStatus::Completed,
            "failed" | "error" => ImportStatus::Failed,
            _ => ImportStatus::Other(raw.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Completed | ImportStatus::Failed)
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Pending => write!(f, "pending"),
            ImportStatus::Processing => write!(f, "processing"),
            ImportStatus::Completed => write!(f, "completed"),
            ImportStatus::Failed => write!(f, "failed"),
            ImportStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl TaskStatus {
    pub fn state(&self) -> ImportStatus {
        ImportStatus::parse(&self.status)
    }

    /// Summary of what extraction found; `null` reads as absent.
    pub fn extracted_data_summary(&self) -> Option<&Value> {
        self.extra
            .get("extractedDataSummary")
            .filter(|summary| !summary.is_null())
    }

    /// Backend error text, if any and not blank.
    pub fn error(&self) -> Option<&str> {
        str_field(&self.extra, "error").filter(|e| !e.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArkProfile {
    pub id: Id,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    WorkExperience,
    Education,
    Training,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    /// Display order used when picking the first entry to show.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::WorkExperience,
        SectionKind::Education,
        SectionKind::Training,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "work_experience",
            SectionKind::Education => "education",
            SectionKind::Training => "training",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }

    /// Only these sections accept create and patch calls.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            SectionKind::WorkExperience | SectionKind::Education | SectionKind::Training
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::WorkExperience => "work experience",
            SectionKind::Education => "education",
            SectionKind::Training => "training",
            SectionKind::Skills => "skill",
            SectionKind::Projects => "project",
            SectionKind::Certifications => "certification",
        }
    }
}

impl std::str::FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.path() == s.trim().to_lowercase().replace('-', "_"))
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}

/// Every section of a Career Ark profile, keyed by section name. The backend
/// sends `null` or an object for sections with no entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllSections {
    pub fields: JsonObject,
}

impl AllSections {
    pub fn section(&self, kind: SectionKind) -> &[Value] {
        list_field(&self.fields, kind.path())
    }

    /// First non-empty section and the id of its first entry ("0" if the
    /// entry carries none).
    pub fn first_entry(&self) -> Option<(SectionKind, String)> {
        SectionKind::ALL.into_iter().find_map(|kind| {
            self.section(kind).first().map(|entry| {
                let id = match entry.get("id") {
                    Some(Value::String(s)) if !s.is_empty() => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => "0".to_string(),
                };
                (kind, id)
            })
        })
    }

    pub fn total_entries(&self) -> usize {
        SectionKind::ALL
            .into_iter()
            .map(|kind| self.section(kind).len())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMaterialsRequest {
    #[serde(rename = "jobAdvert")]
    pub job_advert: String,
    #[serde(rename = "arcData")]
    pub arc_data: Value,
}
