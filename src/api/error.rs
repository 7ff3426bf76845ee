//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::auth::AuthError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Selection referenced something the dataset does not have
    #[error("{0}")]
    Analytics(#[from] AnalyticsError),

    /// Identity provider failure; rejections carry the provider's message verbatim
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Analytics(AnalyticsError::UnknownDrug(_)) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_DRUG")
            }
            ApiError::Auth(AuthError::Rejected(_)) => (StatusCode::BAD_REQUEST, "AUTH_REJECTED"),
            ApiError::Auth(AuthError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, "AUTH_TIMEOUT"),
            ApiError::Auth(AuthError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "AUTH_UNAVAILABLE")
            }
            ApiError::Auth(AuthError::Request(_)) => (StatusCode::BAD_GATEWAY, "AUTH_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejection_is_verbatim() {
        let err = ApiError::from(AuthError::Rejected("EMAIL_EXISTS".to_string()));
        assert_eq!(err.to_string(), "EMAIL_EXISTS");
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "AUTH_REJECTED")
        );
    }

    #[test]
    fn test_status_codes() {
        let unknown = ApiError::from(AnalyticsError::UnknownDrug("Kratom".to_string()));
        assert_eq!(unknown.status_and_code().0, StatusCode::BAD_REQUEST);

        let down = ApiError::from(AuthError::Unavailable("no key".to_string()));
        assert_eq!(down.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);

        let timeout = ApiError::from(AuthError::Timeout);
        assert_eq!(timeout.status_and_code().0, StatusCode::GATEWAY_TIMEOUT);

        let hover = ApiError::Validation("hover must look like Drug@YYYY-MM".to_string());
        assert_eq!(
            hover.status_and_code(),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
    }
}
