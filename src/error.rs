use thiserror::Error;
use std::collections::HashMap;
use serde::{Serialize, Deserialize};

// Import Axum types for HTTP response conversion
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Structured validation errors with field-level error mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationErrors {
    Single { field: String, message: String },
    Multiple { fields: HashMap<String, String> },
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrors::Single { field, message } => write!(f, "{}: {}", field, message),
            ValidationErrors::Multiple { fields } => {
                let mut entries: Vec<_> = fields.iter().collect();
                entries.sort();
                let joined = entries
                    .into_iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}", joined)
            }
        }
    }
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A migration failure at startup.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A validation error with field-level details.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A request that is well-formed but not allowed in the current state.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A forbidden error (user lacks permission).
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// A conflict error (resource already exists).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An authentication error (missing, invalid or expired credentials).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An upstream API (API Ninjas, Google) failed or returned garbage.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// A feature whose upstream credentials are not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Shorthand for a single-field validation error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation(ValidationErrors::Single {
            field: field.to_string(),
            message: message.into(),
        })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ExternalService(err.to_string())
    }
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response
///
/// Each variant maps to a status code and a JSON body with an error message
/// and a machine-readable error code.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match self {
            Error::Validation(errors) => match errors {
                ValidationErrors::Single { field, message } => {
                    serde_json::json!({
                        "error": "Validation failed",
                        "code": "VALIDATION_ERROR",
                        "fields": {
                            field: message
                        }
                    })
                }
                ValidationErrors::Multiple { fields } => {
                    serde_json::json!({
                        "error": "Validation failed",
                        "code": "VALIDATION_ERROR",
                        "fields": fields
                    })
                }
            },
            Error::BadRequest(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "BAD_REQUEST"
                })
            }
            Error::NotFound(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "NOT_FOUND"
                })
            }
            Error::Forbidden(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "FORBIDDEN"
                })
            }
            Error::Conflict(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "CONFLICT"
                })
            }
            Error::Authentication(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "AUTHENTICATION_FAILED"
                })
            }
            Error::ExternalService(_) => {
                serde_json::json!({
                    "error": "Upstream service request failed",
                    "code": "EXTERNAL_SERVICE_ERROR"
                })
            }
            Error::ServiceUnavailable(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "SERVICE_UNAVAILABLE"
                })
            }
            Error::Sqlx(_) | Error::Migration(_) => {
                serde_json::json!({
                    "error": "Database error",
                    "code": "INTERNAL_ERROR"
                })
            }
            Error::Internal(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "INTERNAL_ERROR"
                })
            }
            Error::Config(_) => {
                serde_json::json!({
                    "error": "Configuration error",
                    "code": "CONFIG_ERROR"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (Error::validation("email", "bad"), StatusCode::BAD_REQUEST),
            (Error::BadRequest("no".to_string()), StatusCode::BAD_REQUEST),
            (Error::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (Error::Forbidden("x".to_string()), StatusCode::FORBIDDEN),
            (Error::Conflict("x".to_string()), StatusCode::CONFLICT),
            (Error::Authentication("x".to_string()), StatusCode::UNAUTHORIZED),
            (Error::ExternalService("x".to_string()), StatusCode::BAD_GATEWAY),
            (Error::ServiceUnavailable("x".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::Internal("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_display() {
        let error = ValidationErrors::Single {
            field: "email".to_string(),
            message: "Email cannot be empty".to_string(),
        };
        assert_eq!(error.to_string(), "email: Email cannot be empty");
    }
}
