//! Protocol error types.

use thiserror::Error;

/// Errors raised while encoding or decoding wire records.
///
/// Every decode failure is fatal for the connection that produced it: the
/// transport closes rather than guessing what the peer meant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Record could not be parsed as the expected JSON shape.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// Record could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Non-text frame received on a text-only channel.
    #[error("unexpected binary frame ({len} bytes)")]
    BinaryFrame {
        /// Size of the rejected frame
        len: usize,
    },

    /// Exercise kind tag not recognized.
    #[error("unknown exercise kind: {0}")]
    UnknownKind(String),
}
