//! Latian channel wire protocol.
//!
//! The channel transport exchanges one JSON text message per logical event.
//! Outbound messages are [`Directive`]s, encoded as a tagged record
//! `{"type": ..., "data": ...}`. Inbound messages are [`InboundMessage`]s
//! carrying the raw answer to the most recent `input` directive.
//!
//! # Protocol invariant
//!
//! Exactly one `input` directive is outstanding per connection. The peer
//! answers it with an inbound message; `input_invalid` means "resend",
//! `input_ok` means the request was satisfied and the peer should wait for
//! the next directive. An inbound message with no outstanding request is a
//! desynchronization and closes the connection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod directive;
mod error;
mod kind;

pub use codec::{decode_directive, decode_inbound, encode_directive, encode_inbound};
pub use directive::{Directive, EventRecord, ExerciseRecord, InboundMessage, InputPrompt};
pub use error::ProtocolError;
pub use kind::ExerciseKind;

/// Marker wrapping control option names on the wire (`<cancel>`).
pub const CONTROL_OPEN: char = '<';

/// Closing counterpart of [`CONTROL_OPEN`].
pub const CONTROL_CLOSE: char = '>';

/// Wrap a control option name for the wire.
pub fn control_option(name: &str) -> String {
    format!("{CONTROL_OPEN}{name}{CONTROL_CLOSE}")
}

/// Bare name of a wire control option, or `None` for a regular option.
pub fn as_control_option(option: &str) -> Option<&str> {
    option.strip_prefix(CONTROL_OPEN).and_then(|rest| rest.strip_suffix(CONTROL_CLOSE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_options_round_trip_through_markers() {
        let wrapped = control_option("cancel");
        assert_eq!(wrapped, "<cancel>");
        assert_eq!(as_control_option(&wrapped), Some("cancel"));
    }

    #[test]
    fn regular_options_are_not_controls() {
        assert_eq!(as_control_option("timed"), None);
        assert_eq!(as_control_option("<open"), None);
        assert_eq!(as_control_option("close>"), None);
    }
}
