//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a `{"message": ...}`
//! JSON body with an appropriate status code.
//!
//! Internal errors (storage, generation) are logged with full detail; the
//! caller only sees a generic message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bloom_app_core::{AppCoreError, GenerationError, StoreError};
use bloom_types::ErrorBody;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Body returned when the daily quote cannot be produced.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate daily dose of love.";

/// All errors that can occur in the bloom-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the accepted size.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// A dependency the server needs (the database) is not reachable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected failure inside the server itself.
    #[error("internal error: {0}")]
    Internal(String),

    /// Propagated from the SQLite (or other) store.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// The external text generator failed or timed out.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::PayloadTooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m.clone()),
            ServerError::Unavailable(m) => {
                error!(reason = %m, "service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable".to_owned())
            }

            ServerError::Internal(m) => {
                error!(reason = %m, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
            }
            ServerError::Storage(e) => {
                error!(error = %e, "storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
            }
            ServerError::Generation(e) => {
                error!(error = %e, "daily quote generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE.to_owned())
            }
        };
        (status, Json(ErrorBody::new(client_message))).into_response()
    }
}

impl From<AppCoreError> for ServerError {
    fn from(e: AppCoreError) -> Self {
        match e {
            AppCoreError::Validation(m) => ServerError::BadRequest(m),
            AppCoreError::Storage(e) => ServerError::Storage(e),
            AppCoreError::Generation(e) => ServerError::Generation(e),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(rejection.body_text())
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    }
}

impl From<ValidationErrors> for ServerError {
    /// Report the first failing rule, the way the client shows one line.
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| errs.iter().map(move |e| (field.clone(), e)))
            .map(|(field, e)| match &e.message {
                Some(m) => m.to_string(),
                None => format!("{field} is invalid"),
            })
            .next()
            .unwrap_or_else(|| "invalid request".to_owned());
        ServerError::BadRequest(message)
    }
}
