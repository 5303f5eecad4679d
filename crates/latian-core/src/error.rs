//! Error types for the session engine.
//!
//! [`SessionError`] doubles as the control-flow signal for leaving a dialog:
//! `Terminated` and `Reset` are not failures, they are the two ways a
//! dialog ends early. Validation failures never leave the input loop and are
//! modelled separately as [`InvalidInput`].

use thiserror::Error;

/// Errors and control-flow signals raised inside a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The user is leaving: interrupt, end of input, or disconnect.
    ///
    /// Permanent for the session. Open write scopes close without
    /// retraction so the final messages stay visible.
    #[error("session terminated")]
    Terminated,

    /// The enclosing dialog was cancelled by the user.
    ///
    /// Recoverable. Scopes unwind with retraction and control returns to
    /// the nearest loop that handles resets.
    #[error("dialog reset")]
    Reset,

    /// Asked to retract more lines than are visible.
    ///
    /// Programming invariant violation. Fatal to the owning session only.
    #[error("retraction underflow: requested {requested}, {available} visible")]
    RetractionUnderflow {
        /// Lines asked to retract
        requested: usize,
        /// Lines currently in the log
        available: usize,
    },

    /// The transport failed to deliver output.
    #[error("transport error: {0}")]
    Transport(String),

    /// The session's storage context failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl SessionError {
    /// Returns true if this error permanently ends the session.
    pub fn is_termination(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Rejected input value. Recovered inside the input loop by re-prompting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid input: {reason}")]
pub struct InvalidInput {
    /// Why the value was rejected
    pub reason: &'static str,
}

impl InvalidInput {
    /// Create a rejection with a static reason.
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}
