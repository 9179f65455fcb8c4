// Request-level error taxonomy
//
// Every failure surfaced to a caller carries a stable machine-readable
// code alongside the human-readable message. Nothing here is retried;
// retry policy belongs to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed count/limit or out-of-range coordinates
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Geolocation lookup failed or the client address is unusable
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// The completion call failed: auth, network, rate limit or timeout
    #[error("completion unavailable: {0}")]
    CompletionUnavailable(String),

    /// The model returned output that cannot be interpreted as
    /// song recommendations
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Unexpected failure; logged with context, surfaced generically
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::LocationUnavailable(_) => "location_unavailable",
            ApiError::CompletionUnavailable(_) => "completion_unavailable",
            ApiError::SchemaViolation(_) => "schema_violation",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::LocationUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::CompletionUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::SchemaViolation(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::warn!(code = self.code(), "{}", self);
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ApiError::InvalidRequest("x".into()).code(), "invalid_request");
        assert_eq!(
            ApiError::LocationUnavailable("x".into()).code(),
            "location_unavailable"
        );
        assert_eq!(
            ApiError::CompletionUnavailable("x".into()).code(),
            "completion_unavailable"
        );
        assert_eq!(ApiError::SchemaViolation("x".into()).code(), "schema_violation");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::LocationUnavailable("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::CompletionUnavailable("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::SchemaViolation("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
