use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Validation error: {0}")]
    Validation(#[from] core_types::CoreError),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Precondition failures keep their message. Everything else is logged with
/// its full cause and answered with an opaque 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(DbError::NotFound(message)) => (StatusCode::NOT_FOUND, message),
            AppError::Database(DbError::Conflict(message)) => (StatusCode::BAD_REQUEST, message),
            AppError::Database(DbError::InvalidReference(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Validation(core_err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, core_err.to_string())
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
