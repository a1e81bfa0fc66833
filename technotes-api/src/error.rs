/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`; repository outcomes convert with
/// `?` through `From<RepoError>`.
///
/// # Status mapping
///
/// | Repository outcome | Status |
/// |---|---|
/// | `InvalidInput`, `NotFound`, `Blocked` | 400 |
/// | `Conflict` | 409 |
/// | `StoreUnavailable`, `Timeout` | 503 |
/// | `Hashing` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use technotes_shared::error::RepoError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): invalid input, unresolved reference, or a refused
    /// operation
    BadRequest(String),

    /// Not found (404): unknown route
    NotFound(String),

    /// Conflict (409), e.g. duplicate username
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "The data store is temporarily unavailable".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Convert repository outcomes to API errors
impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidInput(msg) | RepoError::NotFound(msg) | RepoError::Blocked(msg) => {
                ApiError::BadRequest(msg)
            }
            RepoError::Conflict(msg) => ApiError::Conflict(msg),
            RepoError::StoreUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            RepoError::Timeout => ApiError::ServiceUnavailable("store operation timed out".to_string()),
            RepoError::Hashing(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::Conflict("Duplicate username".to_string());
        assert_eq!(err.to_string(), "Conflict: Duplicate username");
    }

    #[test]
    fn test_repo_error_status_mapping() {
        let cases = [
            (RepoError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (RepoError::NotFound("x".into()), StatusCode::BAD_REQUEST),
            (RepoError::Blocked("x".into()), StatusCode::BAD_REQUEST),
            (RepoError::Conflict("x".into()), StatusCode::CONFLICT),
            (RepoError::StoreUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (RepoError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
