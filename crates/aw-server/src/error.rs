//! Server-specific error types
//!
//! [`AppError`] is the single place where failures become HTTP statuses.
//! Every command and query error converts into it, so routes only ever
//! return `Result<Response, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;

/// Result type alias for server startup and infrastructure
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Request-level error, rendered with the standard error envelope
#[derive(Error, Debug)]
pub enum AppError {
    /// Input failed validation (400)
    #[error("{0}")]
    Validation(String),

    /// The request is well formed but breaks a business rule (400)
    #[error("{0}")]
    InvalidOperation(String),

    /// A referenced entity does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// A unique key or a dependent row prevents the change (409)
    #[error("{0}")]
    Conflict(String),

    /// Missing or invalid bearer token (401)
    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidOperation(_) => "INVALID_OPERATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!(error = ?e, "Database error");
                "A database error occurred".to_string()
            },
            AppError::Internal(ref message) => {
                tracing::error!(%message, "Internal error");
                "An internal error occurred".to_string()
            },
            ref other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(self.code(), message))).into_response()
    }
}

/// Startup and infrastructure failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Database(#[from] crate::db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] aw_common::AwError),

    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
}
