//! Latian channel server.
//!
//! Networked transport for many concurrent sessions. Each connection owns a
//! queue pair: the session's [`ChannelTransport`] enqueues outbound
//! [`Directive`](latian_proto::Directive)s and blocks on inbound answers,
//! while two pump tasks move records between the queues and the socket.
//!
//! # Components
//!
//! - [`ChannelTransport`]: the session side of a queue pair
//! - [`Link`]: the pump side, which delivers answers and the close token
//! - [`pump`]: outbound and inbound pump tasks over any sink/stream
//! - [`WsAcceptor`]: axum WebSocket endpoint feeding the supervisor

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod error;
pub mod pump;
mod ws;

pub use channel::{ChannelTransport, InboundEvent, Link, queue_pair};
pub use error::ServerError;
pub use ws::{INDEX_HTML, WsAcceptor};
