//! Error types for the store module.

use accredit_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lock guarding the maps was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// Record encoding/decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),

    /// Snapshot written by an incompatible version.
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u64),

    /// Invalid data in a snapshot.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
