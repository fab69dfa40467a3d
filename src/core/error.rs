use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

/// Whether 500 responses expose the underlying error (development only)
static EXPOSE_ERROR_DETAILS: OnceLock<bool> = OnceLock::new();

/// Configure error detail exposure once at startup
pub fn init_error_details(expose: bool) {
    let _ = EXPOSE_ERROR_DETAILS.set(expose);
}

fn expose_details() -> bool {
    EXPOSE_ERROR_DETAILS.get().copied().unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

impl AppError {
    /// Errors the fallback store is allowed to absorb
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, AppError::Database(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                let message = expose_details().then(|| e.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    message,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                let message = expose_details().then(|| msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    message,
                )
            }
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::RateLimitExceeded(ref msg) => {
                (StatusCode::TOO_MANY_REQUESTS, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(error, message));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
