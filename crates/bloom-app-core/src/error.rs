//! Error taxonomy shared by the stores, the generator and the services.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`crate::entities`] store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert collided with a unique key. The quote cache treats this as
    /// a signal to re-read the winning row.
    #[error("unique constraint violated: {key}")]
    UniqueViolation { key: String },

    /// A row that must exist could not be read back.
    #[error("row not found: {0}")]
    RowNotFound(String),

    /// Any other failure from the SQLite (or other) backend.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors returned by a [`crate::generator::TextGenerator`].
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator did not answer within the configured bound.
    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),

    /// Network failure, TLS failure, or an undecodable response body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion API answered with a non-2xx status.
    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The completion API answered 2xx but without any choice.
    #[error("completion API returned no choices")]
    EmptyResponse,
}

/// Errors surfaced by the guestbook and quote services.
#[derive(Debug, Error)]
pub enum AppCoreError {
    /// The caller supplied invalid input.
    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}
