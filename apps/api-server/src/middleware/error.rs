//! Error handling middleware - taxonomy kinds to HTTP responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::{ErrorKind, PostError};
use blog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to JSON error responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound,
    Conflict,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Conflict => write!(f, "Conflict"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::NotFound => ErrorResponse::not_found(),
            AppError::Conflict => ErrorResponse::conflict(),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from the error taxonomy
impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput | ErrorKind::InvalidId => {
                AppError::BadRequest(err.public_message())
            }
            ErrorKind::NotFound => {
                tracing::debug!(error = %err.chain(), "Resource not found");
                AppError::NotFound
            }
            ErrorKind::Conflict => {
                tracing::warn!(error = %err.chain(), "State conflict");
                AppError::Conflict
            }
            ErrorKind::Store => AppError::Internal(err.chain()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
