use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the API handlers, each mapped to an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid recommendation mode '{0}', expected 'city' or 'genre'")]
    InvalidMode(String),

    #[error("malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    #[error("{kind} {id} not found")]
    EntityNotFound { kind: &'static str, id: i64 },

    #[error("user {0} has no listen history")]
    NoListenHistory(i64),

    #[error("could not determine a favorite genre for user {0}")]
    UndeterminedFavoriteGenre(i64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier(_)
            | ApiError::InvalidDate(_)
            | ApiError::InvalidMode(_)
            | ApiError::MalformedCsv { .. } => StatusCode::BAD_REQUEST,
            ApiError::EntityNotFound { .. }
            | ApiError::NoListenHistory(_)
            | ApiError::UndeterminedFavoriteGenre(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error serving request: {:#}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
