//! Application error types and HTTP response mapping.
//!
//! Error mappings:
//! - `Malformed` → 400 (internally inconsistent client request)
//! - `UnknownSection`, `NotFound` → 404
//! - `Git`, `Internal` → 500 (detail goes to the log, not the client)

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::request::RequestError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    Malformed(String),

    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Malformed(msg) => AppError::Malformed(msg),
            RequestError::UnknownSection(name) => AppError::UnknownSection(name),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Malformed(msg) => {
                (StatusCode::BAD_REQUEST, format!("bad request: {msg}"))
            }
            AppError::UnknownSection(name) => (
                StatusCode::NOT_FOUND,
                format!("not found: unknown section '{name}'"),
            ),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("not found: {what}")),
            AppError::Git(err) => {
                tracing::error!(error = %err, "git operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
