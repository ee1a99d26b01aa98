//! Error types for Accredit Core.

use thiserror::Error;

/// Errors raised while encoding or decoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}
