//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup
//! failures and `AppError` for everything a request handler can answer with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use football_blog_core::{InvalidConfidence, LifecycleError, PortError};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::ConfigError;

/// The primary error type for starting the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Blog entry not found")]
    pub message: String,
}

/// Per-request error taxonomy.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or incomplete input.
    Validation(String),
    /// A uniqueness constraint was hit.
    Conflict(String),
    /// Login failed; deliberately vague about which part was wrong.
    InvalidCredentials,
    /// Missing, malformed or expired bearer token.
    Unauthorized,
    Forbidden(String),
    NotFound(String),
    /// Body exceeded the configured request limit.
    PayloadTooLarge(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_message(self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg) => msg,
            AppError::InvalidCredentials => "Invalid credentials".into(),
            AppError::Unauthorized => "Authentication failed".into(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal Server Error".into()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            message: self.into_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PortError> for AppError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(msg) => AppError::NotFound(msg),
            PortError::Conflict(msg) => AppError::Conflict(msg),
            PortError::Unexpected(detail) => AppError::Internal(detail),
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        AppError::Forbidden(err.to_string())
    }
}

impl From<InvalidConfidence> for AppError {
    fn from(err: InvalidConfidence) -> Self {
        AppError::Validation(err.to_string())
    }
}
