//! Storage error types.

use latian_core::SessionError;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Accessed before `connect` or after `disconnect`.
    #[error("storage is not connected")]
    NotConnected,

    /// User name cannot be used as a storage key.
    #[error("invalid user name: {0:?}")]
    InvalidUser(String),

    /// Document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying file system error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
