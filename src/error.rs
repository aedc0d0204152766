// Client-side error types
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-keyed validation messages as returned by the backend:
/// `{ "errors": { "email": ["already taken"] } }`
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong between a screen and the backend
#[derive(Debug, Error)]
pub enum ClientError {
    // Login rejected, for whatever reason
    #[error("Invalid credentials")]
    InvalidCredentials,

    // 401 from a protected endpoint; the session is left untouched
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Backend rejected a submitted record
    #[error("{message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    // Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error body shape used by the backend for failed requests
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

impl ClientError {
    /// Build the error for a non-2xx response from its status and raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        if status == 401 {
            return ClientError::Unauthorized(
                parsed.message.unwrap_or_else(|| "Unauthenticated.".to_string()),
            );
        }

        match parsed.errors {
            Some(errors) if !errors.is_empty() => ClientError::Validation {
                message: parsed
                    .message
                    .unwrap_or_else(|| "The given data was invalid.".to_string()),
                errors,
            },
            _ => ClientError::Api {
                status,
                message: parsed.message.unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        format!("request failed with status {}", status)
                    } else {
                        body.trim().to_string()
                    }
                }),
            },
        }
    }

    /// Field errors carried by a validation failure, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// HTTP status associated with the failure, when there was a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Validation { .. } => Some(422),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::InvalidCredentials => "INVALID_CREDENTIALS",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Http(_) => "HTTP_ERROR",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Url(_) => "INVALID_URL",
            ClientError::Session(_) => "SESSION_ERROR",
            ClientError::Io(_) => "IO_ERROR",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code(),
        });

        if let Some(errors) = self.field_errors() {
            response["errors"] = json!(errors);
        }

        response
    }
}
