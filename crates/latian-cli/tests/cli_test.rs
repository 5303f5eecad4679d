//! End-to-end CLI runs over local transports.

use std::{
    io::{self, Read},
    sync::Arc,
    thread,
    time::Duration,
};

use latian_app::{
    RuntimeMode, Settings, Supervisor, default_actions, resolve, storage::storage_backends,
};
use latian_cli::{LocalAcceptor, LocalTransport, acceptors, supervisor};

fn settings(io: &str, runtime: &str, storage: &str) -> Settings {
    Settings {
        io: io.into(),
        runtime: runtime.into(),
        storage: storage.into(),
        bind: "127.0.0.1".into(),
        port: 0,
        ..Settings::default()
    }
}

#[test]
fn transports_are_registered_in_order() {
    assert_eq!(acceptors().names(), ["std", "ws"]);
}

#[tokio::test]
async fn unknown_names_list_valid_choices() {
    let err = supervisor(&settings("telnet", "simple", "file")).err().unwrap();
    assert_eq!(err.to_string(), "unknown io \"telnet\", expected one of: std, ws");

    let err = supervisor(&settings("ws", "simple", "redis")).err().unwrap();
    assert_eq!(err.to_string(), "unknown storage \"redis\", expected one of: file, memory");

    let err = supervisor(&settings("ws", "threaded", "memory")).err().unwrap();
    assert_eq!(err.to_string(), "unknown runtime \"threaded\", expected one of: simple, multi");
}

#[tokio::test]
async fn bad_bind_address_fails_before_start() {
    let bad = Settings { bind: "not an address".into(), ..settings("ws", "multi", "memory") };
    assert!(supervisor(&bad).is_err());
    assert!(supervisor(&settings("ws", "multi", "memory")).is_ok());
}

#[tokio::test]
async fn local_session_runs_to_exit_message() {
    // configure, then: start session > rep > push up > 12, then end of input
    let input: &'static [u8] = b"bye\n100\n300\n3\n1\n1\n1\n12\n";
    let transport = LocalTransport::new(input, Vec::new());
    let screen = transport.screen();
    let backend = *resolve(&storage_backends(), "storage", "memory").unwrap();
    let storage = backend(&Settings::default());

    Supervisor::new(
        RuntimeMode::Single,
        Box::new(LocalAcceptor::new(Box::new(transport))),
        Arc::clone(&storage),
        Arc::new(default_actions()),
        "ana",
    )
    .run()
    .await
    .unwrap();

    let out = String::from_utf8(screen.lock().unwrap().output().clone()).unwrap();
    assert!(out.contains("- configuration -\n"));
    assert!(out.contains("+ push up (rep)"));
    assert!(out.ends_with("bye\n"));

    let mut ctx = storage();
    ctx.connect("ana").unwrap();
    assert_eq!(ctx.events().unwrap()[0].value, 12);
}

/// Terminal input that never answers.
struct Silent;

impl Read for Silent {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        loop {
            thread::park();
        }
    }
}

#[tokio::test]
async fn interrupt_during_pending_read_ends_single_session() {
    let transport = LocalTransport::new(io::BufReader::new(Silent), Vec::new());
    let screen = transport.screen();
    let interrupt = transport.interrupt_handle();
    let backend = *resolve(&storage_backends(), "storage", "memory").unwrap();

    let session = Supervisor::new(
        RuntimeMode::Single,
        Box::new(LocalAcceptor::new(Box::new(transport))),
        backend(&Settings::default()),
        Arc::new(default_actions()),
        "ana",
    );
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        interrupt.notify_one();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), session.run()).await;

    assert!(matches!(outcome, Ok(Ok(()))));
    let out = String::from_utf8(screen.lock().unwrap().output().clone()).unwrap();
    assert!(out.ends_with("cya\n"), "{out}");
}
