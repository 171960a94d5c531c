use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use intake_core::error::CoreError;
use intake_db::error::{constraint_name, is_foreign_key_violation, is_unique_violation};
use intake_db::TransactionError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds storage and HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `intake_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failed atomic storage unit.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// A malformed request the extractors could not make sense of.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            // --- Storage errors ---
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Transaction(err) => match err {
                TransactionError::Operation { source, .. } => classify_sqlx_error(source),
                TransactionError::Rejected(core) => classify_core_error(core),
                other => {
                    tracing::error!(error = %other, "Transaction error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Reference(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "REFERENCE_ERROR",
            msg.clone(),
        ),
        CoreError::Upstream(msg) => {
            tracing::error!(error = %msg, "Upstream service error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "File storage did not accept the upload batch".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign-key violations map to 422 (unknown referenced id).
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }
    if is_foreign_key_violation(err) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "REFERENCE_ERROR",
            "One or more referenced ids do not exist".to_string(),
        );
    }
    if is_unique_violation(err) {
        if let Some(constraint) = constraint_name(err).filter(|c| c.starts_with("uq_")) {
            tracing::warn!(constraint, "Unique constraint violated");
            return (StatusCode::CONFLICT, "CONFLICT", conflict_message(constraint));
        }
    }
    tracing::error!(error = %err, "Database error");
    internal()
}

/// Client-facing message for a unique violation; never names the constraint.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_accounts_username" => "Username is already taken".to_string(),
        _ => "A record with this value already exists".to_string(),
    }
}
