//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dirgate_core::error::DirgateError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error payload returned to API callers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// API-layer error wrapping the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DirgateError);

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DirgateError::UnknownRole { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_ROLE"),
            DirgateError::InvalidHost { .. } => (StatusCode::BAD_REQUEST, "INVALID_HOST"),
            DirgateError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION"),
            DirgateError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DirgateError::AlreadyExists { .. } => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            DirgateError::AssignmentTransaction(reason) => {
                error!(error = %reason, "Assignment transaction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ASSIGNMENT_TRANSACTION_FAILED",
                )
            }
            DirgateError::Database(msg) | DirgateError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
            }
        };

        // Storage details stay in the logs.
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "internal server error".to_string(),
            _ => self.0.to_string(),
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

/// Failures that abort server startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("directory store unavailable: {0}")]
    Store(#[from] dirgate_db::DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
