// src/error.rs
//! Client error type. Every variant renders a non-empty user-facing message.

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::response::ApiErrorType;

pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Token missing, expired, rejected by the gateway, or undecodable.
    /// Storage has already been cleared when this is returned.
    #[error("Session expired, please log in again")]
    SessionExpired { redirect_to: String },

    #[error("{context}: {message}")]
    Http {
        status: StatusCode,
        context: String,
        message: String,
        kind: Option<ApiErrorType>,
    },

    #[error("{context}: unexpected response body ({source})")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Live session without the rights the call needs.
    #[error("{0}")]
    Forbidden(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Message suitable for direct display in a view. Never empty.
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Http { message, context, .. } => {
                if message.trim().is_empty() {
                    context.clone()
                } else {
                    message.clone()
                }
            }
            ApiError::Decode { .. } => UNKNOWN_ERROR.to_string(),
            other => other.to_string(),
        };

        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. })
    }

    /// HTTP status of a rejected request, if the gateway answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::SessionExpired { .. } => None,
            ApiError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ApiError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_prefers_backend_message() {
        let err = ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            context: "Failed to create job".to_string(),
            message: "title is required".to_string(),
            kind: Some(ApiErrorType::ValidationError),
        };
        assert_eq!(err.user_message(), "title is required");
        assert_eq!(err.to_string(), "Failed to create job: title is required");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_http_error_falls_back_to_context() {
        let err = ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            context: "Failed to fetch jobs".to_string(),
            message: "   ".to_string(),
            kind: None,
        };
        assert_eq!(err.user_message(), "Failed to fetch jobs");
    }

    #[test]
    fn test_decode_error_is_unknown() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ApiError::Decode {
            context: "Failed to fetch settings".to_string(),
            source,
        };
        assert_eq!(err.user_message(), UNKNOWN_ERROR);
    }

    #[test]
    fn test_session_expired_message() {
        let err = ApiError::SessionExpired {
            redirect_to: "/login".to_string(),
        };
        assert!(err.is_session_expired());
        assert!(!err.user_message().is_empty());
    }
}
