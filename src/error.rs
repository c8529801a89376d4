//! Error types for Guardrail Core.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure of the text-generation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Unified error type for Guardrail operations.
#[derive(Debug, Error)]
pub enum GuardrailError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for GuardrailError {
    fn from(e: config::ConfigError) -> Self {
        GuardrailError::Config(e.to_string())
    }
}

impl From<regex::Error> for GuardrailError {
    fn from(e: regex::Error) -> Self {
        GuardrailError::Config(format!("invalid rule pattern: {}", e))
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for GuardrailError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            GuardrailError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            GuardrailError::Backend(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Backend error");
                let status = match e {
                    BackendError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status,
                    "BACKEND_ERROR",
                    "The text generation backend failed".to_string(),
                    None,
                )
            }
            GuardrailError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            GuardrailError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for Guardrail operations.
pub type GuardrailResult<T> = Result<T, GuardrailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_map_to_gateway_statuses() {
        let response = GuardrailError::from(BackendError::EmptyResponse).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = GuardrailError::from(BackendError::Timeout(30)).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response =
            GuardrailError::Internal("pipeline task panicked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let err: GuardrailError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, GuardrailError::Config(_)));
    }
}
