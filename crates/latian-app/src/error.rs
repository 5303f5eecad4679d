//! Application error types.

use latian_core::SessionError;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors that end a supervisor run.
#[derive(Error, Debug)]
pub enum AppError {
    /// A registry lookup with a name nobody registered.
    #[error("unknown {kind} {name:?}, expected one of: {}", .valid.join(", "))]
    UnknownImplementation {
        /// Registry being searched (`io`, `storage`, `runtime`)
        kind: &'static str,
        /// Requested name
        name: String,
        /// Registered names
        valid: Vec<String>,
    },

    /// Single-session mode found no transport to run on.
    #[error("no transport was accepted")]
    NoTransport,

    /// Network endpoint could not be set up.
    #[error("transport setup failed: {0}")]
    Transport(String),

    /// A single session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Storage failed outside a session.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
