//! Server error types.

use std::net::SocketAddr;

use latian_proto::ProtocolError;
use thiserror::Error;

/// Errors that can occur in the channel server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Peer sent a record that could not be decoded.
    ///
    /// Fatal for that connection; other connections are unaffected.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Peer answered while no input request was outstanding.
    #[error("connection {connection} desynchronized: input with no outstanding request")]
    Desync {
        /// Connection id
        connection: u64,
    },

    /// Connection was already closed.
    #[error("connection {connection} is closed")]
    Closed {
        /// Connection id
        connection: u64,
    },
}
