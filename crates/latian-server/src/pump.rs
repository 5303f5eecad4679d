//! Pump tasks moving records between a queue pair and a duplex stream.
//!
//! The pumps are generic over any [`Sink`] of text and [`Stream`] of
//! [`Frame`]s, so the WebSocket endpoint and tests share them. Either pump
//! closes the connection through its [`Link`] on a transport-level error;
//! the close token reaches the session exactly once.

use std::fmt::Display;

use futures::{Sink, SinkExt, Stream, StreamExt};
use latian_proto::{Directive, ProtocolError, encode_directive};
use tokio::sync::mpsc;

use crate::Link;

/// One frame read from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text record.
    Text(String),
    /// A binary frame of this many bytes. Never valid.
    Binary(usize),
    /// Transport keep-alive traffic.
    Control,
    /// The peer closed the stream.
    Close,
}

/// Serialize outbound directives to the peer until the queue ends.
///
/// The queue ends when the session unbinds its transport. A failed send
/// closes the connection and stops the pump.
pub async fn pump_outbound<S>(link: Link, mut outbound: mpsc::UnboundedReceiver<Directive>, mut sink: S)
where
    S: Sink<String> + Unpin,
    S::Error: Display,
{
    while let Some(directive) = outbound.recv().await {
        let text = match encode_directive(&directive) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(connection = link.id(), %err, kind = directive.kind(), "dropping directive");
                continue;
            },
        };
        if let Err(err) = sink.send(text).await {
            tracing::debug!(connection = link.id(), %err, "send failed");
            link.close();
            return;
        }
    }

    if let Err(err) = sink.close().await {
        tracing::debug!(connection = link.id(), %err, "close failed");
    }
}

/// Deserialize peer records into the inbound queue until the stream ends.
pub async fn pump_inbound<S, E>(link: Link, mut stream: S)
where
    S: Stream<Item = Result<Frame, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Frame::Text(text)) => {
                if link.receive(&text).is_err() {
                    return;
                }
            },
            Ok(Frame::Binary(len)) => {
                let err = ProtocolError::BinaryFrame { len };
                tracing::warn!(connection = link.id(), %err, "closing desynchronized connection");
                break;
            },
            Ok(Frame::Control) => {},
            Ok(Frame::Close) => break,
            Err(err) => {
                tracing::debug!(connection = link.id(), %err, "receive failed");
                break;
            },
        }
    }
    link.close();
}

/// Run both pumps for one connection until both finish.
pub async fn serve_connection<Tx, Rx, E>(
    link: Link,
    outbound: mpsc::UnboundedReceiver<Directive>,
    sink: Tx,
    stream: Rx,
) where
    Tx: Sink<String> + Unpin,
    Tx::Error: Display,
    Rx: Stream<Item = Result<Frame, E>> + Unpin,
    E: Display,
{
    tokio::join!(pump_outbound(link.clone(), outbound, sink), pump_inbound(link, stream));
}
