//! Interactive session I/O engine.
//!
//! Lets the same turn-based dialog logic run over structurally different
//! transports: a local line-oriented terminal and a networked duplex channel
//! serving many simultaneous users.
//!
//! # Components
//!
//! - [`OutputLog`]: append-only record of messages shown to one user, with
//!   retraction of the most recent entries
//! - [`WriteScope`]: RAII region whose writes are retracted on exit unless
//!   the session is permanently terminating
//! - [`Console::read`]: validated input loop that leaves no visual residue
//! - [`TimerOverlay`]: background updater owning one transient timer line
//! - [`Transport`]: the boundary implemented by each concrete transport
//!
//! # Termination
//!
//! Termination and dialog resets are ordinary [`SessionError`] values
//! returned up the call chain. A termination marks the [`Console`] so every
//! open scope closes without retracting, leaving the final state visible.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod console;
mod error;
pub mod input;
mod log;
mod message;
pub mod render;
mod scope;
pub mod timer;
mod transport;

pub use console::Console;
pub use error::{InvalidInput, SessionError};
pub use input::{Choice, ChoiceSet, InputEvent, InputRequest};
pub use log::OutputLog;
pub use message::Message;
pub use scope::WriteScope;
pub use timer::{OverlaySurface, TimerHandle, TimerOverlay, TimerState};
pub use transport::{InputMode, Transport};
