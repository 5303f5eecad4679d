//! WebSocket endpoint.
//!
//! `GET /` serves the bundled browser client and `GET /ws` upgrades to a
//! WebSocket carrying the channel protocol. Every upgrade becomes one
//! [`ChannelTransport`] handed to the supervisor through [`WsAcceptor`].

use std::{
    future,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Router,
    extract::{
        State,
        ws::{self, WebSocket, WebSocketUpgrade},
    },
    response::{Html, Response},
    routing::get,
};
use futures::{SinkExt, StreamExt};
use latian_app::{Acceptor, AppError};
use latian_core::Transport;
use tokio::{net::TcpListener, sync::mpsc};
use tower_http::trace::TraceLayer;

use crate::{ChannelTransport, ServerError, pump, queue_pair};

/// Bundled browser client.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

impl From<ws::Message> for pump::Frame {
    fn from(message: ws::Message) -> Self {
        match message {
            ws::Message::Text(text) => Self::Text(text),
            ws::Message::Binary(bytes) => Self::Binary(bytes.len()),
            ws::Message::Ping(_) | ws::Message::Pong(_) => Self::Control,
            ws::Message::Close(_) => Self::Close,
        }
    }
}

#[derive(Clone)]
struct Endpoint {
    accepted: mpsc::UnboundedSender<ChannelTransport>,
    next_id: Arc<AtomicU64>,
}

/// Router serving the client and the WebSocket upgrade.
fn router(endpoint: Endpoint) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ws", get(upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(endpoint)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn upgrade(socket: WebSocketUpgrade, State(endpoint): State<Endpoint>) -> Response {
    socket.on_upgrade(move |socket| connection(socket, endpoint))
}

async fn connection(socket: WebSocket, endpoint: Endpoint) {
    let id = endpoint.next_id.fetch_add(1, Ordering::Relaxed);
    let (transport, link, outbound) = queue_pair(id);
    if endpoint.accepted.send(transport).is_err() {
        tracing::warn!(connection = id, "supervisor gone, refusing connection");
        return;
    }
    tracing::debug!(connection = id, "websocket upgraded");

    let (sink, stream) = socket.split();
    let sink = sink.with(|text: String| future::ready(Ok::<_, axum::Error>(ws::Message::Text(text))));
    let stream = stream.map(|message| message.map(pump::Frame::from));
    pump::serve_connection(link, outbound, sink, stream).await;
}

/// Acceptor yielding one channel transport per WebSocket connection.
///
/// Accepting never ends on its own: the endpoint keeps serving until the
/// process exits.
pub struct WsAcceptor {
    addr: SocketAddr,
    local_addr: Option<SocketAddr>,
    pending: Option<mpsc::UnboundedSender<ChannelTransport>>,
    accepted: mpsc::UnboundedReceiver<ChannelTransport>,
}

impl WsAcceptor {
    /// Acceptor that will listen on `addr` once started.
    pub fn new(addr: SocketAddr) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { addr, local_addr: None, pending: Some(tx), accepted: rx }
    }

    /// Bound address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Bind the listener and spawn the HTTP server.
    pub async fn listen(&mut self) -> Result<SocketAddr, ServerError> {
        if let Some(addr) = self.local_addr {
            return Ok(addr);
        }
        let bind = |source| ServerError::Bind { addr: self.addr, source };
        let listener = TcpListener::bind(self.addr).await.map_err(bind)?;
        let addr = listener.local_addr().map_err(bind)?;

        let Some(accepted) = self.pending.take() else {
            return Ok(addr);
        };
        let endpoint = Endpoint { accepted, next_id: Arc::new(AtomicU64::new(1)) };
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router(endpoint)).await {
                tracing::error!(%err, "http server failed");
            }
        });

        tracing::info!("serving http://{addr}");
        self.local_addr = Some(addr);
        Ok(addr)
    }
}

#[async_trait]
impl Acceptor for WsAcceptor {
    async fn start(&mut self) -> Result<(), AppError> {
        self.listen().await.map_err(|err| AppError::Transport(err.to_string()))?;
        Ok(())
    }

    async fn accept(&mut self) -> Option<Box<dyn Transport>> {
        let transport = self.accepted.recv().await?;
        tracing::debug!(connection = transport.id(), "handing connection to supervisor");
        Some(Box::new(transport))
    }
}
