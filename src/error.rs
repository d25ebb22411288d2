use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::{ErrorResponse, ValidationErrorResponse};
use crate::serializers::ValidationErrors;

/// Error taxonomy for the API. Every handler failure funnels through this
/// type, which owns the mapping onto HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-keyed validation failure; the request had no side effects.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// A path-addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness or foreign-key violation surfaced by the storage layer.
    #[error("{message}")]
    Conflict { message: String, code: &'static str },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ApiError {
    /// Classify a failed write: unique and foreign-key violations become
    /// conflicts, anything else stays a database error.
    pub fn classify_write(err: DbErr, message: impl Into<String>, code: &'static str) -> Self {
        let detail = match &err {
            DbErr::Exec(exec_err) => exec_err.to_string(),
            DbErr::Query(query_err) => query_err.to_string(),
            _ => String::new(),
        }
        .to_lowercase();

        if detail.contains("unique") || detail.contains("constraint") {
            return ApiError::Conflict {
                message: message.into(),
                code,
            };
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    errors: errors.into_map(),
                    code: "VALIDATION_ERROR".to_string(),
                    success: false,
                }),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                error_response(StatusCode::NOT_FOUND, message, "NOT_FOUND")
            }
            ApiError::Conflict { message, code } => {
                error_response(StatusCode::CONFLICT, message, code)
            }
            ApiError::Unauthorized(message) => {
                error_response(StatusCode::UNAUTHORIZED, message, "UNAUTHORIZED")
            }
            ApiError::Forbidden(message) => {
                error_response(StatusCode::FORBIDDEN, message, "FORBIDDEN")
            }
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
            ApiError::Database(db_error) => {
                error!("Database error: {}", db_error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal database error".to_string(),
                    "DATABASE_ERROR",
                )
            }
        }
    }
}

fn error_response(status: StatusCode, message: String, code: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        }),
    )
        .into_response()
}
