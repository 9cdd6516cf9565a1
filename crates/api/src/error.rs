use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagedock_core::archive::ArchiveError;
use pagedock_core::error::CoreError;
use serde_json::json;

use crate::cache::CacheError;
use crate::response::{CODE_INTERNAL, CODE_UNAUTHORIZED};

/// Application-level error type for HTTP handlers.
///
/// Business outcomes (soft 404s, bad credentials, missing upload file) are
/// *not* errors -- handlers return them inside the response envelope.
/// `AppError` covers infrastructure failures and auth rejections, and
/// produces an envelope-shaped JSON body so clients can always parse
/// `{ code, msg, data }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pagedock_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Archive extraction failed; the upload is aborted before any DB write.
    #[error("Extraction failed: {0}")]
    Archive(#[from] ArchiveError),

    /// The verification-code cache is unreachable.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    404,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, 400, msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, CODE_UNAUTHORIZED, msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Archive(err) => {
                tracing::error!(error = %err, "Archive extraction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CODE_INTERNAL,
                    format!("Extraction failed: {err}"),
                )
            }

            AppError::Cache(err) => {
                tracing::error!(error = %err, "Verification cache error");
                internal()
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 400, msg.clone()),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "code": code,
            "msg": message,
            "data": null,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, u16, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        CODE_INTERNAL,
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into a transport status, envelope code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 409 -- the race window behind the handler-level existence checks.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, u16, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            404,
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        409,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
