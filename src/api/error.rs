use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Field name to the server's messages for that field.
pub type FieldMessages = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 422 carrying per-field messages.
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldMessages,
    },

    #[error("{message}")]
    Http { status: u16, message: String },

    /// A 2xx response whose envelope says `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<FieldMessages>,
}

impl ApiError {
    /// The one line shown to the user when a request fails.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        match self {
            ApiError::Validation { .. } => true,
            ApiError::Http { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }

    /// Only transport failures and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Build the error for a non-2xx response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = parsed.message.filter(|m| !m.trim().is_empty());

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            if let Some(errors) = parsed.errors {
                return ApiError::Validation {
                    message: message.unwrap_or_else(|| "Validation failed".to_string()),
                    errors,
                };
            }
        }

        ApiError::Http {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown status")
                )
            }),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
