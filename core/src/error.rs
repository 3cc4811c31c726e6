//! Error types for request encoding, dispatch, and response normalization.
//!
//! # Design
//! Encoding and read failures originate in this crate and get their own
//! variants. Transport failures are passed through untouched with the
//! original error kept as the source, so callers can downcast to the
//! transport's error type.

use thiserror::Error;

/// The request body could not be turned into wire bytes.
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),
}

/// Errors returned by request building, dispatch, and normalization.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("failed to encode request: {0}")]
    Encoding(#[from] EncodingError),

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    Read(#[source] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Encoding(EncodingError::Json(err))
    }
}

impl From<serde_urlencoded::ser::Error> for HttpError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        HttpError::Encoding(EncodingError::Form(err))
    }
}
