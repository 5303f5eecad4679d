//! Deterministic test doubles for the Latian session engine.
//!
//! [`ScriptedTransport`] implements [`latian_core::Transport`] over a queue
//! of pre-scripted input events, recording every operation the console
//! issues. [`TerminalSurface`] emulates a line-oriented screen that applies
//! retractions, so tests can assert on exactly what a user would see.
//!
//! Both sides are shared through a [`ScriptProbe`], which stays with the
//! test after the transport is boxed into a console.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod scripted;
mod surface;

pub use scripted::{Op, ScriptProbe, ScriptedTransport};
pub use surface::TerminalSurface;
