use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== Gateway Error Bodies =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    ValidationError,
    ProfileError,
    SessionError,
    RateLimitError,
    ServerError,
}

/// Error body shapes seen across the gateway's services: the CV workflow
/// service answers `{detail, type}`, the others `{error}` or `{message}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
}

impl ApiErrorBody {
    /// First non-blank textual message in `detail`, `error`, `message` order.
    pub fn message(&self) -> Option<String> {
        [&self.detail, &self.error, &self.message]
            .into_iter()
            .flatten()
            .find_map(text_of)
    }

    pub fn error_type(&self) -> Option<ApiErrorType> {
        self.kind
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        // FastAPI validation errors put a list of {msg, loc} objects in `detail`
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => obj.get("msg").and_then(Value::as_str).map(str::to_string),
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
