//! Local terminal transport.
//!
//! Writes rendered lines to an output stream and reads answers one line at a
//! time. Retraction erases lines with ANSI control sequences: for each line,
//! clear the current line, move the cursor up and clear to the end of the
//! screen. An interrupt or end of input ends the session.
//!
//! Lines are read on a dedicated thread and handed over a channel. A blocking
//! read cannot be cancelled, so an interrupted session leaves the thread
//! parked on its read instead of holding up runtime shutdown.

use std::{
    io::{self, BufRead, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread,
};

use async_trait::async_trait;
use crossterm::{
    QueueableCommand,
    cursor::MoveUp,
    terminal::{Clear, ClearType},
};
use latian_app::Acceptor;
use latian_core::{
    InputEvent, InputMode, InputRequest, Message, OverlaySurface, SessionError, TimerHandle,
    TimerOverlay, Transport, render,
};
use tokio::sync::{Notify, mpsc};

/// Line surface shared by the transport and its timer overlay.
///
/// Tracks the unterminated prompt line so the overlay can redraw it.
#[derive(Debug)]
pub struct Screen<W> {
    out: W,
    /// Text on the current line not yet ended by the user's newline.
    partial: String,
}

impl<W: Write> Screen<W> {
    /// Screen writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, partial: String::new() }
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn write(&mut self, message: &Message) -> io::Result<()> {
        let text = render::render(message);
        match message {
            Message::Prompt(_) => {
                write!(self.out, "{text}")?;
                self.partial.push_str(&text);
            },
            _ => {
                writeln!(self.out, "{text}")?;
                self.partial.clear();
            },
        }
        self.out.flush()
    }

    fn retract(&mut self, count: usize) -> io::Result<()> {
        for _ in 0..count {
            self.out
                .queue(Clear(ClearType::CurrentLine))?
                .queue(MoveUp(1))?
                .queue(Clear(ClearType::FromCursorDown))?;
        }
        self.partial.clear();
        self.out.flush()
    }

    /// The user ended the current line.
    fn line_entered(&mut self) {
        self.partial.clear();
    }

    /// Input ended without a newline; finish the line ourselves.
    fn end_line(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.partial.clear();
        self.out.flush()
    }

    fn redraw(&mut self, overlay: Option<&str>) -> io::Result<()> {
        write!(self.out, "\r")?;
        self.out.queue(Clear(ClearType::CurrentLine))?;
        if let Some(overlay) = overlay {
            write!(self.out, "{overlay}  ")?;
        }
        write!(self.out, "{}", self.partial)?;
        self.out.flush()
    }
}

impl<W: Write + Send + 'static> OverlaySurface for Screen<W> {
    fn draw(&mut self, text: &str) {
        if let Err(err) = self.redraw(Some(text)) {
            tracing::debug!(%err, "timer draw failed");
        }
    }

    fn clear(&mut self) {
        if let Err(err) = self.redraw(None) {
            tracing::debug!(%err, "timer clear failed");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn io_error(err: &io::Error) -> SessionError {
    SessionError::Transport(err.to_string())
}

/// Lines from the reader thread, newline included when the user typed one.
type Lines = mpsc::Receiver<io::Result<String>>;

fn spawn_reader<R: BufRead + Send + 'static>(mut input: R) -> Lines {
    let (tx, rx) = mpsc::channel(8);
    let spawned = thread::Builder::new().name("latian-input".into()).spawn(move || {
        loop {
            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.blocking_send(Ok(line)).is_err() {
                        break;
                    }
                },
                Err(err) => {
                    let _ = tx.blocking_send(Err(err));
                    break;
                },
            }
        }
    });
    if let Err(err) = spawned {
        tracing::error!(%err, "input reader failed to start");
    }
    rx
}

/// Transport over a line reader and a terminal writer.
pub struct LocalTransport<W> {
    lines: Lines,
    screen: Arc<Mutex<Screen<W>>>,
    interrupt: Arc<Notify>,
}

impl LocalTransport<io::Stdout> {
    /// Transport on the process's stdin and stdout, ending on ctrl-c.
    ///
    /// Must be called from within a tokio runtime.
    pub fn stdio() -> Self {
        let transport = Self::new(io::BufReader::new(io::stdin()), io::stdout());
        let interrupt = transport.interrupt_handle();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                interrupt.notify_one();
            }
        });
        transport
    }
}

impl<W: Write + Send + 'static> LocalTransport<W> {
    /// Transport reading lines from `input` and writing to `output`.
    pub fn new(input: impl BufRead + Send + 'static, output: W) -> Self {
        Self {
            lines: spawn_reader(input),
            screen: Arc::new(Mutex::new(Screen::new(output))),
            interrupt: Arc::new(Notify::new()),
        }
    }

    /// Handle that ends the pending (or next) read as an interrupt.
    pub fn interrupt_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.interrupt)
    }

    /// The shared screen.
    pub fn screen(&self) -> Arc<Mutex<Screen<W>>> {
        Arc::clone(&self.screen)
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Transport for LocalTransport<W> {
    fn input_mode(&self) -> InputMode {
        InputMode::Terminal
    }

    fn write(&mut self, message: &Message) -> Result<(), SessionError> {
        lock(&self.screen).write(message).map_err(|e| io_error(&e))
    }

    fn retract(&mut self, count: usize) -> Result<(), SessionError> {
        lock(&self.screen).retract(count).map_err(|e| io_error(&e))
    }

    async fn read_event(&mut self, _request: &InputRequest) -> InputEvent {
        let read = tokio::select! {
            line = self.lines.recv() => line,
            () = self.interrupt.notified() => {
                tracing::debug!("interrupted");
                None
            },
        };

        match read {
            Some(Ok(line)) if line.ends_with('\n') => {
                lock(&self.screen).line_entered();
                let answer = line.trim_end_matches(['\n', '\r']);
                InputEvent::Line(answer.to_string())
            },
            Some(Ok(line)) => {
                // final line without a newline
                if let Err(err) = lock(&self.screen).end_line() {
                    tracing::debug!(%err, "terminal write failed");
                }
                InputEvent::Line(line)
            },
            outcome => {
                match outcome {
                    Some(Err(err)) => tracing::debug!(%err, "input read failed"),
                    _ => tracing::debug!("input closed"),
                }
                if let Err(err) = lock(&self.screen).end_line() {
                    tracing::debug!(%err, "terminal write failed");
                }
                InputEvent::Closed
            },
        }
    }

    fn start_timer(&mut self, lead_in_secs: i64) -> TimerHandle {
        TimerOverlay::start(lead_in_secs, Arc::clone(&self.screen))
    }

    async fn unbind(&mut self) {
        if let Err(err) = lock(&self.screen).out.flush() {
            tracing::debug!(%err, "final flush failed");
        }
    }
}

/// Acceptor yielding a single local transport, then nothing.
pub struct LocalAcceptor {
    transport: Option<Box<dyn Transport>>,
}

impl LocalAcceptor {
    /// Acceptor handing out `transport` once.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport: Some(transport) }
    }
}

#[async_trait]
impl Acceptor for LocalAcceptor {
    async fn accept(&mut self) -> Option<Box<dyn Transport>> {
        self.transport.take()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use latian_core::Console;

    use super::*;

    type Script = LocalTransport<Vec<u8>>;

    /// One line erased.
    const ERASE: &str = "\x1b[2K\x1b[1A\x1b[J";

    fn output(screen: &Arc<Mutex<Screen<Vec<u8>>>>) -> String {
        String::from_utf8(lock(screen).output().clone()).unwrap()
    }

    #[tokio::test]
    async fn invalid_answers_leave_no_residue() {
        let transport: Script = LocalTransport::new(&b"abc\n-1\n7\n"[..], Vec::new());
        let screen = transport.screen();
        let mut console = Console::new(Box::new(transport));

        let value = console.read_int(None, 0, None).await.unwrap();

        assert_eq!(value, 7);
        assert!(console.log().is_empty());
        assert_eq!(
            output(&screen),
            format!("> {ERASE}try again > {ERASE}try again > {ERASE}")
        );
    }

    #[tokio::test]
    async fn end_of_input_terminates() {
        let transport: Script = LocalTransport::new(&b""[..], Vec::new());
        let screen = transport.screen();
        let mut console = Console::new(Box::new(transport));

        let result = console.read_string(Some("name")).await;

        assert_eq!(result, Err(SessionError::Terminated));
        // prompt text stays, the glyph line is ended and erased
        assert!(output(&screen).starts_with("name\n> \n"));
        assert_eq!(console.log().len(), 1);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_answered() {
        let mut transport: Script = LocalTransport::new(&b"yes"[..], Vec::new());

        let event = transport.read_event(&InputRequest::new(None)).await;

        assert_eq!(event, InputEvent::Line("yes".into()));
    }

    /// Input whose read never returns.
    struct Stalled;

    impl io::Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            loop {
                thread::park();
            }
        }
    }

    #[tokio::test]
    async fn interrupt_ends_pending_read() {
        let mut transport: Script = LocalTransport::new(io::BufReader::new(Stalled), Vec::new());
        transport.interrupt_handle().notify_one();

        let event = transport.read_event(&InputRequest::new(None)).await;

        assert_eq!(event, InputEvent::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_redraws_pending_prompt() {
        let mut transport: Script = LocalTransport::new(io::BufReader::new(Stalled), Vec::new());
        let screen = transport.screen();

        transport.write(&Message::Prompt("press enter...".into())).unwrap();
        let timer = transport.start_timer(3);
        tokio::time::sleep(Duration::from_millis(1050)).await;
        timer.stop();

        let out = output(&screen);
        assert!(out.contains("\r\x1b[2K2s  press enter..."));
        assert!(out.ends_with("\r\x1b[2Kpress enter..."));
    }

    #[tokio::test]
    async fn local_acceptor_yields_once() {
        let transport: Script = LocalTransport::new(&b""[..], Vec::new());
        let mut acceptor = LocalAcceptor::new(Box::new(transport));

        assert!(acceptor.accept().await.is_some());
        assert!(acceptor.accept().await.is_none());
    }
}
