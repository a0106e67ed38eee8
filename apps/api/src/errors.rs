use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching_client::MatchingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Non-2xx answer from the matching service. The body is surfaced verbatim.
    #[error("Matching service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Matching service unreachable: {0}")]
    Transport(String),

    #[error("Matching service sent an invalid payload: {0}")]
    InvalidUpstream(String),

    #[error("Storage error: {0}")]
    Storage(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MatchingError> for AppError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::Api { status, message } => AppError::Upstream {
                status,
                body: message,
            },
            MatchingError::Http(e) => AppError::Transport(e.to_string()),
            MatchingError::Parse(e) => AppError::InvalidUpstream(e.to_string()),
            MatchingError::InvalidPayload(msg) => AppError::InvalidUpstream(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Upstream { status, body } => {
                tracing::warn!("Matching service returned {status}: {body}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", body.clone())
            }
            AppError::Transport(msg) => {
                tracing::error!("Matching service transport error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNREACHABLE",
                    format!("Could not reach the matching service: {msg}"),
                )
            }
            AppError::InvalidUpstream(msg) => {
                tracing::error!("Invalid matching payload: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INVALID_UPSTREAM_PAYLOAD",
                    msg.clone(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
