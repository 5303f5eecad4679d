//! Per-session console: output log, write scopes and the input loop.

use latian_proto::ExerciseKind;

use crate::{
    Choice, ChoiceSet, InputEvent, InputMode, InputRequest, InvalidInput, Message, OutputLog,
    SessionError, TimerHandle, Transport, WriteScope, input,
};

/// The read/write facade dialog logic runs against.
///
/// Owns the session's [`OutputLog`] and its bound [`Transport`]. Every write
/// goes to the transport and is recorded in the log; every retraction is
/// checked against the log before it reaches the transport, so the visible
/// surface and the log never diverge.
///
/// A console is exclusively owned by one session task.
pub struct Console {
    log: OutputLog,
    transport: Box<dyn Transport>,
    /// Per open write scope, messages written in it and still visible.
    frames: Vec<usize>,
    terminated: bool,
    /// First invariant violation; every later operation fails with it.
    fault: Option<SessionError>,
}

impl Console {
    /// Wrap a transport with an empty log.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { log: OutputLog::new(), transport, frames: Vec::new(), terminated: false, fault: None }
    }

    /// The session's output log.
    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    /// How the bound transport presents input.
    pub fn input_mode(&self) -> InputMode {
        self.transport.input_mode()
    }

    /// Whether a termination signal has been observed.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Mark the session as permanently terminating.
    ///
    /// Scopes still open close without retracting.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Open a write region. Its writes are retracted when the guard drops.
    pub fn scope(&mut self) -> WriteScope<'_> {
        WriteScope::open(self)
    }

    /// Append a message.
    pub fn write(&mut self, message: Message) -> Result<(), SessionError> {
        self.check_fault()?;
        self.transport.write(&message)?;
        self.log.append(message);
        if let Some(frame) = self.frames.last_mut() {
            *frame += 1;
        }
        Ok(())
    }

    /// Append a text line.
    pub fn write_message(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.write(Message::Text(text.into()))
    }

    /// Append an exercise event line.
    pub fn write_event(
        &mut self,
        kind: ExerciseKind,
        exercise: &str,
        value: i64,
        prefix: Option<&str>,
    ) -> Result<(), SessionError> {
        self.write(Message::event(kind, exercise, value, prefix))
    }

    /// Append an exercise description line.
    pub fn write_exercise(
        &mut self,
        kind: ExerciseKind,
        name: &str,
        prefix: Option<&str>,
    ) -> Result<(), SessionError> {
        self.write(Message::exercise(kind, name, prefix))
    }

    /// Retract the `count` most recent messages.
    ///
    /// The retraction is debited from the innermost open scopes first, so
    /// they do not retract the same lines again when they close.
    pub fn retract(&mut self, count: usize) -> Result<(), SessionError> {
        self.retract_untracked(count)?;

        let mut remaining = count;
        for frame in self.frames.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            let debit = remaining.min(*frame);
            *frame -= debit;
            remaining -= debit;
        }
        Ok(())
    }

    /// Start the transport's timer overlay.
    pub fn start_timer(&mut self, lead_in_secs: i64) -> TimerHandle {
        self.transport.start_timer(lead_in_secs)
    }

    /// Attach the transport.
    pub async fn bind(&mut self) -> Result<(), SessionError> {
        self.transport.bind().await
    }

    /// Detach the transport.
    pub async fn unbind(&mut self) {
        self.transport.unbind().await;
    }

    /// Validated input loop.
    ///
    /// Runs inside its own write scope. On a terminal the prompt message,
    /// numbered options and one glyph per attempt are written and retracted;
    /// on a remote peer the request is forwarded and each outcome
    /// acknowledged. Invalid answers re-prompt. A closed transport
    /// terminates the session and returns [`SessionError::Terminated`],
    /// leaving the prompt visible.
    pub async fn read<T, F>(&mut self, request: InputRequest, validate: F) -> Result<T, SessionError>
    where
        F: Fn(&str) -> Result<T, InvalidInput> + Send,
    {
        self.check_fault()?;
        if self.terminated {
            return Err(SessionError::Terminated);
        }

        let mode = self.transport.input_mode();
        let mut scope = self.scope();

        if mode == InputMode::Terminal {
            if let Some(message) = &request.message {
                let text = match request.choices {
                    Some(_) => format!("{message}:"),
                    None => message.clone(),
                };
                scope.write(Message::Text(text))?;
            }
            if let Some(choices) = &request.choices {
                for (k, label) in choices.labels().enumerate() {
                    scope.write(Message::Text(format!("  {}: {label}", k + 1)))?;
                }
            }
        }

        let mut retry = false;
        loop {
            if mode == InputMode::Terminal {
                scope.write(Message::Prompt(request.glyph(retry).to_string()))?;
            }
            let event = scope.transport.read_event(&request).await;
            if mode == InputMode::Terminal {
                scope.retract(1)?;
            }

            let raw = match event {
                InputEvent::Line(raw) => raw,
                InputEvent::Closed => {
                    tracing::debug!("input closed, terminating session");
                    scope.terminate();
                    return Err(SessionError::Terminated);
                },
            };

            match validate(&raw) {
                Ok(value) => {
                    scope.transport.resolve(true)?;
                    return Ok(value);
                },
                Err(err) => {
                    tracing::trace!(%err, "input rejected");
                    scope.transport.resolve(false)?;
                    retry = true;
                },
            }
        }
    }

    /// Wait for any input event.
    pub async fn read_signal(&mut self, message: Option<&str>) -> Result<(), SessionError> {
        self.read(InputRequest::signal(message), |_| Ok(())).await
    }

    /// Read a non-empty string.
    pub async fn read_string(&mut self, message: Option<&str>) -> Result<String, SessionError> {
        self.read(InputRequest::new(message), input::non_empty).await
    }

    /// Read an integer in `[min, max]`, `max` unbounded if `None`.
    pub async fn read_int(
        &mut self,
        message: Option<&str>,
        min: i64,
        max: Option<i64>,
    ) -> Result<i64, SessionError> {
        self.read(InputRequest::new(message), input::int_in_range(min, max)).await
    }

    /// Read a selection from options and trailing control options.
    pub async fn read_choice_with_controls(
        &mut self,
        choices: ChoiceSet,
        message: Option<&str>,
    ) -> Result<Choice, SessionError> {
        let mode = self.input_mode();
        let set = choices.clone();
        self.read(InputRequest::choice(choices, message), move |raw| set.select(mode, raw)).await
    }

    /// Read one of `options`.
    pub async fn read_choice<I, S>(
        &mut self,
        options: I,
        message: Option<&str>,
    ) -> Result<String, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.read_choice_with_controls(ChoiceSet::new(options), message).await? {
            Choice::Option(value) | Choice::Control(value) => Ok(value),
        }
    }

    /// Ask a yes/no question.
    pub async fn read_confirm(&mut self, message: &str) -> Result<bool, SessionError> {
        Ok(self.read_choice(["yes", "no"], Some(message)).await? == "yes")
    }

    pub(crate) fn push_frame(&mut self) -> usize {
        self.frames.push(0);
        self.frames.len()
    }

    pub(crate) fn frame_count(&self, depth: usize) -> usize {
        depth.checked_sub(1).and_then(|i| self.frames.get(i)).copied().unwrap_or(0)
    }

    pub(crate) fn pop_frame(&mut self, depth: usize) -> usize {
        debug_assert_eq!(self.frames.len(), depth, "write scopes closed out of order");
        self.frames.pop().unwrap_or(0)
    }

    /// Retract without touching scope counters.
    pub(crate) fn retract_untracked(&mut self, count: usize) -> Result<(), SessionError> {
        self.check_fault()?;
        if count == 0 {
            return Ok(());
        }

        if let Err(err) = self.log.retract(count) {
            tracing::error!(%err, "output log invariant violated");
            self.fault = Some(err.clone());
            return Err(err);
        }
        self.transport.retract(count)
    }

    fn check_fault(&self) -> Result<(), SessionError> {
        match &self.fault {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("visible", &self.log.len())
            .field("scopes", &self.frames.len())
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
