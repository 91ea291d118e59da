//! Axum-specific error types and mappings.
//!
//! Maps batch-level rejections and request parsing failures to HTTP status
//! codes and a `{message, status}` JSON body.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use vidgrab_core::BatchError;

/// Message returned for any unexpected failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Malformed or oversized batch. No job was started.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<BatchError> for HttpError {
    fn from(err: BatchError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
///
/// The panic payload is logged, never sent to the client.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    tracing::error!(target: "vidgrab.http", panic = %detail, "Request handler panicked");
    HttpError::Internal(INTERNAL_ERROR_MESSAGE.to_string()).into_response()
}
