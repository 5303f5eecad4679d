//! Transport abstraction.
//!
//! The [`Console`](crate::Console) writes through a boxed [`Transport`]
//! chosen at session construction. Two implementations exist: a local
//! terminal (single session, ANSI line erasure) and a channel (one queue pair
//! per networked connection).

use async_trait::async_trait;

use crate::{InputEvent, InputRequest, Message, SessionError, TimerHandle};

/// How a transport presents input requests to its user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Line-oriented terminal. The console renders prompt text, numbered
    /// options and glyphs itself; options are answered by 1-based index.
    Terminal,
    /// Structured peer. The request is forwarded whole; options are
    /// answered by literal value and outcomes are acknowledged.
    Remote,
}

/// Output surface and input source for one session.
///
/// Implementations must apply writes and retractions in call order.
#[async_trait]
pub trait Transport: Send {
    /// Presentation mode for input requests.
    fn input_mode(&self) -> InputMode;

    /// Append one message to the user-visible surface.
    fn write(&mut self, message: &Message) -> Result<(), SessionError>;

    /// Remove the `count` most recently written messages.
    fn retract(&mut self, count: usize) -> Result<(), SessionError>;

    /// Block for exactly one input event answering `request`.
    async fn read_event(&mut self, request: &InputRequest) -> InputEvent;

    /// Report the outcome of validating the last event.
    ///
    /// Terminals ignore this; the retry glyph already tells the user.
    fn resolve(&mut self, _accepted: bool) -> Result<(), SessionError> {
        Ok(())
    }

    /// Start a transient timer line counting from `-lead_in_secs`.
    fn start_timer(&mut self, lead_in_secs: i64) -> TimerHandle;

    /// Attach the transport to its session.
    async fn bind(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    /// Detach the transport. Called once, after the session ends.
    async fn unbind(&mut self) {}
}
