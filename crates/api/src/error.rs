use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use prepcall_core::error::CoreError;
use prepcall_evaluation::EvaluationError;
use serde_json::json;

/// Error type returned by every HTTP handler.
///
/// Wraps the domain errors of the lower crates and adds the two
/// HTTP-specific cases handlers occasionally need. [`IntoResponse`] turns
/// all of them into the same `{"error", "code"}` JSON envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `prepcall_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure inside the evaluation pipeline.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// The sanitized 500 triple. Anything that reaches it has already been
/// logged with the real cause.
fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(err) => core_error_response(err),
            AppError::Database(err) => database_error_response(err),
            AppError::Evaluation(err) => evaluation_error_response(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn core_error_response(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::InsufficientCredits { user_id } => {
            tracing::info!(user_id, "interview blocked: no credits remaining");
            (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_CREDITS",
                "No interview credits remaining".to_string(),
            )
        }
        CoreError::EvaluationFailed(msg) => {
            tracing::error!(error = %msg, "evaluation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EVALUATION_FAILED",
                format!("Evaluation failed: {msg}"),
            )
        }
        CoreError::Upstream(msg) => {
            // The provider's message may embed URLs or keys, so it stays
            // out of the response body.
            tracing::error!(error = %msg, "upstream provider call failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Upstream provider request failed".to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "internal core error");
            internal()
        }
    }
}

fn evaluation_error_response(err: &EvaluationError) -> (StatusCode, &'static str, String) {
    match err {
        EvaluationError::MalformedTranscript => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Transcript has no recognizable question/answer exchanges".to_string(),
        ),
        EvaluationError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Session with id {id} not found"),
        ),
        EvaluationError::ScorerUnavailable(msg) => {
            tracing::error!(error = %msg, "answer scorer unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EVALUATION_FAILED",
                "Evaluation failed: scorer unavailable".to_string(),
            )
        }
        EvaluationError::Serialization(e) => {
            tracing::error!(error = %e, "evaluation result serialization failed");
            internal()
        }
        EvaluationError::Database(e) => database_error_response(e),
    }
}

/// Map a sqlx error onto the response envelope.
///
/// `RowNotFound` becomes a 404. A Postgres unique violation (code 23505) on
/// one of our `uq_`-named constraints becomes a 409, since those guard
/// client-visible uniqueness. Everything else is logged and sanitized to a
/// 500.
fn database_error_response(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint() {
                Some(name) if name.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {name}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "unique violation outside uq_ constraints");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "database error");
            internal()
        }
    }
}
