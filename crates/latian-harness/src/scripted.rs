//! Scripted transport.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use latian_core::{
    InputEvent, InputMode, InputRequest, Message, SessionError, TimerHandle, TimerOverlay,
    Transport,
};
use latian_proto::InputPrompt;

use crate::TerminalSurface;

/// One operation the console issued against the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// A message was written.
    Write(Message),
    /// Messages were retracted.
    Retract(usize),
    /// A new input request was presented.
    Request(InputPrompt),
    /// The outcome of validating an answer.
    Resolve(bool),
    /// A timer overlay was started with this lead-in.
    TimerStarted(i64),
    /// The timer overlay was stopped.
    TimerStopped,
    /// The transport was bound.
    Bound,
    /// The transport was unbound.
    Unbound,
}

#[derive(Default)]
struct Shared {
    ops: Vec<Op>,
    /// Input events, each delivered after its delay elapses.
    inputs: VecDeque<(Duration, InputEvent)>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport over a pre-scripted input queue.
///
/// Once the script runs dry, reads return [`InputEvent::Closed`], so a
/// dialog that outlives its script terminates instead of hanging.
///
/// Requests are recorded the way the channel transport sends them: once per
/// read, not once per attempt.
pub struct ScriptedTransport {
    mode: InputMode,
    shared: Arc<Mutex<Shared>>,
    surface: Arc<Mutex<TerminalSurface>>,
    outstanding: bool,
}

impl ScriptedTransport {
    /// Empty script in the given mode.
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            shared: Arc::new(Mutex::new(Shared::default())),
            surface: Arc::new(Mutex::new(TerminalSurface::new())),
            outstanding: false,
        }
    }

    /// Terminal-mode transport answering with `lines` in order.
    pub fn terminal<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(InputMode::Terminal).with_lines(lines)
    }

    /// Remote-mode transport answering with `lines` in order.
    pub fn remote<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(InputMode::Remote).with_lines(lines)
    }

    /// Queue more answers.
    #[must_use]
    pub fn with_lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let probe = self.probe();
        for line in lines {
            probe.push_line(line);
        }
        self
    }

    /// Handle for scripting and inspection.
    pub fn probe(&self) -> ScriptProbe {
        ScriptProbe { shared: Arc::clone(&self.shared), surface: Arc::clone(&self.surface) }
    }

    /// Box for a console.
    pub fn boxed(self) -> Box<dyn Transport> {
        Box::new(self)
    }

    fn record(&self, op: Op) {
        lock(&self.shared).ops.push(op);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn input_mode(&self) -> InputMode {
        self.mode
    }

    fn write(&mut self, message: &Message) -> Result<(), SessionError> {
        lock(&self.surface).write(message);
        self.record(Op::Write(message.clone()));
        Ok(())
    }

    fn retract(&mut self, count: usize) -> Result<(), SessionError> {
        lock(&self.surface).retract(count);
        self.record(Op::Retract(count));
        Ok(())
    }

    async fn read_event(&mut self, request: &InputRequest) -> InputEvent {
        if !self.outstanding {
            self.outstanding = true;
            self.record(Op::Request(request.to_prompt()));
        }

        let next = lock(&self.shared).inputs.pop_front();
        let Some((delay, event)) = next else {
            tracing::debug!("script exhausted");
            return InputEvent::Closed;
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        event
    }

    fn resolve(&mut self, accepted: bool) -> Result<(), SessionError> {
        if accepted {
            self.outstanding = false;
        }
        self.record(Op::Resolve(accepted));
        Ok(())
    }

    fn start_timer(&mut self, lead_in_secs: i64) -> TimerHandle {
        self.record(Op::TimerStarted(lead_in_secs));
        let overlay = TimerOverlay::start(lead_in_secs, Arc::clone(&self.surface));
        let shared = Arc::clone(&self.shared);
        TimerHandle::new(move || {
            overlay.stop();
            lock(&shared).ops.push(Op::TimerStopped);
        })
    }

    async fn bind(&mut self) -> Result<(), SessionError> {
        self.record(Op::Bound);
        Ok(())
    }

    async fn unbind(&mut self) {
        self.record(Op::Unbound);
    }
}

/// Test-side handle onto a [`ScriptedTransport`].
#[derive(Clone)]
pub struct ScriptProbe {
    shared: Arc<Mutex<Shared>>,
    surface: Arc<Mutex<TerminalSurface>>,
}

impl ScriptProbe {
    /// Queue an answer delivered immediately.
    pub fn push_line(&self, line: impl Into<String>) {
        self.push_after(Duration::ZERO, InputEvent::Line(line.into()));
    }

    /// Queue an event delivered after `delay` of (virtual) time.
    pub fn push_after(&self, delay: Duration, event: InputEvent) {
        lock(&self.shared).inputs.push_back((delay, event));
    }

    /// Queue a disconnect.
    pub fn push_close(&self) {
        self.push_after(Duration::ZERO, InputEvent::Closed);
    }

    /// Every operation so far.
    pub fn ops(&self) -> Vec<Op> {
        lock(&self.shared).ops.clone()
    }

    /// Requests presented so far.
    pub fn requests(&self) -> Vec<InputPrompt> {
        self.filter(|op| match op {
            Op::Request(prompt) => Some(prompt.clone()),
            _ => None,
        })
    }

    /// Validation outcomes so far.
    pub fn resolutions(&self) -> Vec<bool> {
        self.filter(|op| match op {
            Op::Resolve(accepted) => Some(*accepted),
            _ => None,
        })
    }

    /// Messages written so far, in order, including retracted ones.
    pub fn written(&self) -> Vec<Message> {
        self.filter(|op| match op {
            Op::Write(message) => Some(message.clone()),
            _ => None,
        })
    }

    /// Lines currently visible on the emulated surface.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.surface).lines().to_vec()
    }

    /// Snapshot of the emulated surface.
    pub fn surface(&self) -> TerminalSurface {
        lock(&self.surface).clone()
    }

    /// Answers not yet consumed.
    pub fn pending_inputs(&self) -> usize {
        lock(&self.shared).inputs.len()
    }

    fn filter<T>(&self, pick: impl Fn(&Op) -> Option<T>) -> Vec<T> {
        lock(&self.shared).ops.iter().filter_map(pick).collect()
    }
}
