//! Error types for the alerts and notifications server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type.
///
/// Two families: `NotFound` and `Validation` are the public/domain kind and
/// propagate uncaught to the HTTP layer; the remaining variants are the
/// internal/private kind. Sweep jobs catch the internal kind per item.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "Validation", msg.clone()),
            AppError::Email(msg) => {
                tracing::error!("Email error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Email",
                    "Email could not be sent".to_string(),
                )
            }
            AppError::ExternalApi(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "ExternalApi",
                    "Upstream service error".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
