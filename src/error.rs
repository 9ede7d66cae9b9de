use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::error::Error;
use std::fmt;

use crate::menu::MenuError;
use crate::types::ApiResponse;

/// The primary error type for the HTTP layer.
///
/// Every variant renders as the standard envelope
/// `{status, message, error}` with a stable `message` and a detail `error`.
#[derive(Debug)]
pub enum AppError {
    /// For internal server errors that are not expected to be handled by the client.
    Internal(anyhow::Error),
    /// The request body could not be decoded.
    InvalidBody(String),
    /// The `{id}` path segment is not a valid menu id.
    InvalidId(String),
    /// For when a specific field in a request fails validation.
    ValidationError {
        /// The name of the field that failed validation.
        field: String,
        /// A message describing the validation error.
        message: String,
    },
    /// For when a requested menu does not exist.
    NotFound(String),
    /// A `parent_id` in the request body references a missing menu.
    ParentNotFound(String),
    /// No route matched the request.
    RouteNotFound,
    /// For when a service is temporarily unavailable.
    ServiceUnavailable(String),
    /// For errors related to database operations.
    Database(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::InvalidBody(msg) => write!(f, "Invalid request body: {}", msg),
            AppError::InvalidId(msg) => write!(f, "Invalid menu ID: {}", msg),
            AppError::ValidationError { field, message } => {
                write!(f, "Validation error on field '{}': {}", field, message)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ParentNotFound(msg) => write!(f, "Parent not found: {}", msg),
            AppError::RouteNotFound => write!(f, "endpoint not found"),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody(_)
            | AppError::InvalidId(_)
            | AppError::ValidationError { .. }
            | AppError::ParentNotFound(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, detail) = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                ("Internal server error", format!("An internal server error occurred (error id {})", error_id))
            }
            AppError::InvalidBody(msg) => ("Invalid request body", msg),
            AppError::InvalidId(msg) => ("Invalid menu ID", msg),
            AppError::ValidationError { message, .. } => ("Validation failed", message),
            AppError::NotFound(msg) => ("Menu not found", msg),
            AppError::ParentNotFound(msg) => ("Parent menu not found", msg),
            AppError::RouteNotFound => ("endpoint not found", "endpoint not found".to_string()),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                ("Service unavailable", msg)
            }
            AppError::Database(msg) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Database error: {}", msg);
                ("A database error occurred", format!("error id {}", error_id))
            }
        };

        let body = ApiResponse::failure(status.as_u16(), message, detail);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => AppError::Database(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => {
                AppError::ServiceUnavailable("Database connection pool timed out".to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            MenuError::Validation { field, message } => {
                AppError::ValidationError { field: field.to_string(), message }
            }
            MenuError::NotFound(_) => AppError::NotFound(err.to_string()),
            MenuError::ParentNotFound(_) => AppError::ParentNotFound(err.to_string()),
            MenuError::Store(e) => AppError::from(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidId(rejection.body_text())
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
