//! Channel transport and its connection queue pair.
//!
//! Each connection gets two unbounded FIFO queues. The session's
//! [`ChannelTransport`] pushes encoded-to-be [`Directive`]s onto the outbound
//! queue and waits on the inbound queue. The pump side holds a [`Link`],
//! through which decoded peer answers and the single close token enter the
//! inbound queue.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use latian_core::{
    InputEvent, InputMode, InputRequest, Message, SessionError, TimerHandle, Transport,
};
use latian_proto::{Directive, decode_inbound};
use tokio::sync::mpsc;

use crate::ServerError;

/// One entry of a connection's inbound queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Raw answer to the outstanding input request.
    Input(String),
    /// The connection is gone. Delivered at most once.
    Close,
}

#[derive(Debug)]
struct ConnectionState {
    id: u64,
    /// Set while the peer owes an answer.
    awaiting_input: AtomicBool,
    closed: AtomicBool,
    inbound: mpsc::UnboundedSender<InboundEvent>,
}

/// Pump-side handle onto one connection.
#[derive(Debug, Clone)]
pub struct Link {
    state: Arc<ConnectionState>,
}

impl Link {
    /// Connection id.
    pub fn id(&self) -> u64 {
        self.state.id
    }

    /// Whether the close token has been delivered.
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }

    /// Deliver the close token. Returns `false` if it was already delivered.
    pub fn close(&self) -> bool {
        if self.state.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        tracing::debug!(connection = self.state.id, "connection closed");
        // The session may already be gone; nobody left to tell.
        let _ = self.state.inbound.send(InboundEvent::Close);
        true
    }

    /// Decode one text record from the peer and queue its answer.
    ///
    /// A malformed record, or an answer while no request is outstanding,
    /// is a desynchronization: the connection is closed and the error
    /// returned.
    pub fn receive(&self, text: &str) -> Result<(), ServerError> {
        let id = self.state.id;
        if self.is_closed() {
            return Err(ServerError::Closed { connection: id });
        }

        let result = match decode_inbound(text) {
            Ok(message) if self.state.awaiting_input.swap(false, Ordering::AcqRel) => {
                let _ = self.state.inbound.send(InboundEvent::Input(message.input));
                Ok(())
            },
            Ok(_) => Err(ServerError::Desync { connection: id }),
            Err(err) => Err(err.into()),
        };

        if let Err(err) = &result {
            tracing::warn!(connection = id, %err, "closing desynchronized connection");
            self.close();
        }
        result
    }
}

/// Session-side transport over a connection queue pair.
///
/// Writes never block: every operation pushes a directive and returns. If
/// the outbound pump is already gone the directive is dropped; the close
/// token ends the session at its next read.
pub struct ChannelTransport {
    link: Link,
    outbound: Option<mpsc::UnboundedSender<Directive>>,
    inbound: mpsc::UnboundedReceiver<InboundEvent>,
    /// An `input` directive was sent and not yet satisfied.
    outstanding: bool,
}

/// Create a connection's queue pair.
///
/// Returns the session's transport, the pump-side link and the outbound
/// queue the outbound pump drains. The queue ends once the transport is
/// unbound or dropped.
pub fn queue_pair(id: u64) -> (ChannelTransport, Link, mpsc::UnboundedReceiver<Directive>) {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    let link = Link {
        state: Arc::new(ConnectionState {
            id,
            awaiting_input: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            inbound: inbound_tx,
        }),
    };
    let transport = ChannelTransport {
        link: link.clone(),
        outbound: Some(outbound_tx),
        inbound: inbound_rx,
        outstanding: false,
    };
    (transport, link, outbound_rx)
}

impl ChannelTransport {
    /// Connection id.
    pub fn id(&self) -> u64 {
        self.link.id()
    }

    fn send(&self, directive: Directive) {
        let Some(outbound) = &self.outbound else {
            return;
        };
        if outbound.send(directive).is_err() {
            tracing::debug!(connection = self.id(), "outbound queue gone, dropping directive");
        }
    }

    /// Expect an answer, then tell the peer it may send one.
    fn await_answer(&self, directive: Directive) {
        self.link.state.awaiting_input.store(true, Ordering::Release);
        self.send(directive);
    }
}

fn directive_for(message: &Message) -> Directive {
    match message {
        Message::Text(text) | Message::Prompt(text) => Directive::Message(text.clone()),
        Message::Event(event) => Directive::Event(event.clone()),
        Message::Exercise(exercise) => Directive::Exercise(exercise.clone()),
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    fn input_mode(&self) -> InputMode {
        InputMode::Remote
    }

    fn write(&mut self, message: &Message) -> Result<(), SessionError> {
        self.send(directive_for(message));
        Ok(())
    }

    fn retract(&mut self, count: usize) -> Result<(), SessionError> {
        self.send(Directive::UnwriteMessages(count));
        Ok(())
    }

    async fn read_event(&mut self, request: &InputRequest) -> InputEvent {
        if !self.outstanding {
            self.outstanding = true;
            self.await_answer(Directive::Input(request.to_prompt()));
        }

        match self.inbound.recv().await {
            Some(InboundEvent::Input(raw)) => InputEvent::Line(raw),
            Some(InboundEvent::Close) | None => InputEvent::Closed,
        }
    }

    fn resolve(&mut self, accepted: bool) -> Result<(), SessionError> {
        if accepted {
            self.outstanding = false;
            self.send(Directive::InputOk);
        } else {
            self.await_answer(Directive::InputInvalid);
        }
        Ok(())
    }

    fn start_timer(&mut self, lead_in_secs: i64) -> TimerHandle {
        self.send(Directive::Timer(lead_in_secs));
        match self.outbound.clone() {
            Some(outbound) => TimerHandle::new(move || {
                let _ = outbound.send(Directive::UnwriteTimer);
            }),
            None => TimerHandle::detached(),
        }
    }

    async fn bind(&mut self) -> Result<(), SessionError> {
        if self.link.is_closed() {
            return Err(SessionError::Transport(format!("connection {} closed before bind", self.id())));
        }
        tracing::debug!(connection = self.id(), "channel bound");
        Ok(())
    }

    async fn unbind(&mut self) {
        self.outbound = None;
        self.link.close();
        tracing::debug!(connection = self.id(), "channel unbound");
    }
}
