//! API error handling
//!
//! Domain errors are mapped to HTTP statuses here. Client errors carry the
//! domain's reason string; server errors are logged and answered with a
//! generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::ErrorKind;
use domain_claims::{AuthorizationError, ClaimError};
use domain_food::FoodError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { kind: ErrorKind, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message) = match self {
            ApiError::BadRequest { kind, message } => (kind.as_str(), message),
            ApiError::Unauthorized(msg) => ("unauthorized", msg),
            ApiError::Forbidden(msg) => (ErrorKind::Forbidden.as_str(), msg),
            ApiError::NotFound(msg) => (ErrorKind::NotFound.as_str(), msg),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed with server error");
                (ErrorKind::Server.as_str(), "server error".to_string())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        let message = err.to_string();
        match err {
            ClaimError::FoodNotFound(_) | ClaimError::ClaimNotFound(_) => ApiError::NotFound(message),
            ClaimError::NotFoodDonor => ApiError::Forbidden(message),
            ClaimError::Storage(e) => ApiError::Internal(e.to_string()),
            // Self-claims and duplicates are rejected as bad requests
            other => ApiError::BadRequest {
                kind: other.kind(),
                message,
            },
        }
    }
}

impl From<FoodError> for ApiError {
    fn from(err: FoodError) -> Self {
        match err {
            FoodError::NotFound(_) => ApiError::NotFound("food not found".to_string()),
            FoodError::Storage(e) => ApiError::Internal(e.to_string()),
            other => ApiError::BadRequest {
                kind: other.kind(),
                message: other.to_string(),
            },
        }
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
