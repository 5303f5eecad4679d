//! End-to-end runs against a real WebSocket peer.

use futures::{SinkExt, StreamExt};
use latian_app::Acceptor;
use latian_core::{Console, SessionError};
use latian_proto::{Directive, InboundMessage, InputPrompt, decode_directive, encode_inbound};
use latian_server::WsAcceptor;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Peer = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn started() -> WsAcceptor {
    let mut acceptor = WsAcceptor::new("127.0.0.1:0".parse().unwrap());
    acceptor.start().await.unwrap();
    acceptor
}

async fn connect(acceptor: &WsAcceptor) -> Peer {
    let addr = acceptor.local_addr().unwrap();
    let (peer, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    peer
}

async fn next_directive(peer: &mut Peer) -> Directive {
    loop {
        if let Message::Text(text) = peer.next().await.unwrap().unwrap() {
            return decode_directive(&text).unwrap();
        }
    }
}

async fn answer(peer: &mut Peer, value: &str) {
    let text = encode_inbound(&InboundMessage { input: value.into() }).unwrap();
    peer.send(Message::Text(text)).await.unwrap();
}

#[tokio::test]
async fn invalid_answer_is_rejected_then_accepted() {
    let mut acceptor = started().await;
    let mut peer = connect(&acceptor).await;
    let mut console = Console::new(acceptor.accept().await.unwrap());

    let session = tokio::spawn(async move { console.read_choice(["rep", "timed"], Some("pick mode")).await });

    assert_eq!(
        next_directive(&mut peer).await,
        Directive::Input(InputPrompt {
            message: Some("pick mode".into()),
            signal_only: false,
            options: Some(vec!["rep".into(), "timed".into()]),
        })
    );
    answer(&mut peer, "jump").await;
    assert_eq!(next_directive(&mut peer).await, Directive::InputInvalid);
    answer(&mut peer, "timed").await;
    assert_eq!(next_directive(&mut peer).await, Directive::InputOk);

    assert_eq!(session.await.unwrap().unwrap(), "timed");
}

#[tokio::test]
async fn disconnect_terminates_read() {
    let mut acceptor = started().await;
    let mut peer = connect(&acceptor).await;
    let mut console = Console::new(acceptor.accept().await.unwrap());

    let session = tokio::spawn(async move {
        let result = console.read_string(Some("who are you?")).await;
        (result, console.is_terminated())
    });
    assert!(matches!(next_directive(&mut peer).await, Directive::Input(_)));
    peer.close(None).await.unwrap();

    let (result, terminated) = session.await.unwrap();
    assert_eq!(result, Err(SessionError::Terminated));
    assert!(terminated);
}

#[tokio::test]
async fn connections_get_separate_transports() {
    let mut acceptor = started().await;
    let mut first = connect(&acceptor).await;
    let mut a = Console::new(acceptor.accept().await.unwrap());
    let mut second = connect(&acceptor).await;
    let mut b = Console::new(acceptor.accept().await.unwrap());

    a.write_message("for a").unwrap();
    b.write_message("for b").unwrap();
    b.retract(1).unwrap();
    a.write_message("again a").unwrap();

    assert_eq!(next_directive(&mut first).await, Directive::Message("for a".into()));
    assert_eq!(next_directive(&mut first).await, Directive::Message("again a".into()));
    assert_eq!(next_directive(&mut second).await, Directive::Message("for b".into()));
    assert_eq!(next_directive(&mut second).await, Directive::UnwriteMessages(1));
    assert_eq!(a.log().len(), 2);
    assert!(b.log().is_empty());
}

#[tokio::test]
async fn index_serves_bundled_client() {
    let acceptor = started().await;
    let mut stream = TcpStream::connect(acceptor.local_addr().unwrap()).await.unwrap();

    stream.write_all(b"GET / HTTP/1.1\r\nHost: latian\r\nConnection: close\r\n\r\n").await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("<title>latian</title>"));
}

#[tokio::test]
async fn occupied_port_fails_to_start() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut acceptor = WsAcceptor::new(taken.local_addr().unwrap());

    assert!(acceptor.start().await.is_err());
}
