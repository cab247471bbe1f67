//! Unified error handling for the API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use exthub_core::HubError;

/// Unified API error response with proper HTTP status codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status code.
    #[serde(skip)]
    pub status: StatusCode,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    // Common error constructors

    /// Bad request (400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message, StatusCode::BAD_REQUEST)
    }

    /// Unauthorized (401).
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message, StatusCode::UNAUTHORIZED)
    }

    /// Not found (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message, StatusCode::NOT_FOUND)
    }

    /// Conflict (409).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message, StatusCode::CONFLICT)
    }

    /// Validation error (422).
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message, StatusCode::UNPROCESSABLE_ENTITY)
    }

    /// Bad gateway (502) - the extension behind the hub failed.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("BAD_GATEWAY", message, StatusCode::BAD_GATEWAY)
    }

    /// Internal server error (500).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = serde_json::json!({
            "success": false,
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

impl From<HubError> for ErrorResponse {
    fn from(e: HubError) -> Self {
        match &e {
            HubError::Unreachable(_) => Self::bad_gateway(e.to_string()),
            HubError::InvalidMetadata(_) => Self::validation(e.to_string()),
            HubError::DuplicateName(_) => Self::conflict(e.to_string()),
            HubError::NotFound(_) => Self::not_found(e.to_string()),
            HubError::InvalidUrl(_) | HubError::InvalidName(_) => Self::bad_request(e.to_string()),
            HubError::Storage(_) => Self::internal(e.to_string()),
        }
    }
}

/// Result type alias for API handlers.
pub type HandlerResult<T> = Result<T, ErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_error_status_mapping() {
        let cases = [
            (
                HubError::Unreachable("timeout".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                HubError::InvalidMetadata("version".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                HubError::DuplicateName("x".to_string()),
                StatusCode::CONFLICT,
            ),
            (HubError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (
                HubError::InvalidUrl("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                HubError::InvalidName("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                HubError::Storage("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status, status);
        }
    }

    #[test]
    fn test_error_response_display() {
        let err = ErrorResponse::conflict("extension 'x' is already registered");
        assert_eq!(err.code, "CONFLICT");
        assert_eq!(
            err.to_string(),
            "[CONFLICT] extension 'x' is already registered"
        );
    }
}
