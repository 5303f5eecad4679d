//! Latian application layer.
//!
//! Everything above the session I/O engine: the activity-logging domain
//! model, per-user storage, the dialog actions offered from the main menu,
//! the per-session state machine and the [`Supervisor`] that runs sessions.
//!
//! Concrete transports live elsewhere and reach the supervisor through the
//! [`Acceptor`] trait, selected by name from a [`Registry`] at startup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod actions;
mod error;
pub mod model;
mod registry;
mod session;
mod settings;
pub mod storage;
mod supervisor;

pub use actions::{Action, ActionRegistry, Context, default_actions};
pub use error::AppError;
pub use registry::Registry;
pub use session::{Identity, Session, SessionState};
pub use settings::Settings;
pub use supervisor::{Acceptor, RuntimeMode, Supervisor, runtime_modes};

/// Look up `name` in `registry`, reporting the valid names on failure.
pub fn resolve<'a, T>(
    registry: &'a Registry<T>,
    kind: &'static str,
    name: &str,
) -> Result<&'a T, AppError> {
    registry.get(name).ok_or_else(|| AppError::UnknownImplementation {
        kind,
        name: name.to_string(),
        valid: registry.names(),
    })
}
