//! Error types for the catalog service
//!
//! [`StoreError`] is what the stores report; [`ApiError`] is what reaches the
//! wire. Internal detail stays in the logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{DatabaseError, IdentityError};
use serde_json::json;
use thiserror::Error;

/// Outcome taxonomy of the Favorite and Account stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// The identifier is neither a native nor a legacy id
    #[error(transparent)]
    UnresolvableIdentity(#[from] IdentityError),

    /// Nothing stored under the identifier
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or empty input, rejected before touching the store
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    /// Supplied password does not match the stored one
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No connection could be acquired
    #[error("Database unavailable")]
    DatabaseUnavailable(#[source] DatabaseError),

    /// The database failed after the operation started
    #[error("Database error: {0}")]
    Database(#[source] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unavailable() {
            StoreError::DatabaseUnavailable(err)
        } else {
            StoreError::Database(err)
        }
    }
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;

/// Custom error type for the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// No authenticated session
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found with message
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing store unreachable
    #[error("Service unavailable")]
    Unavailable,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnresolvableIdentity(e) => {
                tracing::debug!("{}", e);
                ApiError::NotFound("Not found".to_string())
            }
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            StoreError::InvalidInput(msg) => ApiError::BadRequest(msg.to_string()),
            StoreError::InvalidCredentials => {
                ApiError::BadRequest("Current password is incorrect".to_string())
            }
            StoreError::DatabaseUnavailable(e) => {
                tracing::error!("{}", e);
                ApiError::Unavailable
            }
            StoreError::Database(e) => {
                tracing::error!("{}", e);
                ApiError::InternalServerError
            }
            StoreError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection failed".to_string(),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
