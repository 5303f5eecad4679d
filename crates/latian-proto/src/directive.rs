//! Outbound directives and inbound messages.

use serde::{Deserialize, Serialize};

use crate::ExerciseKind;

/// One encoded outbound instruction.
///
/// Serialized as `{"type": "<snake_case variant>", "data": <payload>}`.
/// Variants without a payload omit `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Directive {
    /// Append a text line.
    Message(String),

    /// Append a structured exercise event line.
    Event(EventRecord),

    /// Append a structured exercise description line.
    Exercise(ExerciseRecord),

    /// Remove the last `n` appended lines.
    UnwriteMessages(usize),

    /// Ask the peer for one input.
    Input(InputPrompt),

    /// The last answer was accepted.
    InputOk,

    /// The last answer was rejected; the peer should answer again.
    InputInvalid,

    /// Show a timer counting down from the lead-in seconds, then up.
    Timer(i64),

    /// Remove the timer.
    UnwriteTimer,
}

impl Directive {
    /// Wire name of this directive's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Event(_) => "event",
            Self::Exercise(_) => "exercise",
            Self::UnwriteMessages(_) => "unwrite_messages",
            Self::Input(_) => "input",
            Self::InputOk => "input_ok",
            Self::InputInvalid => "input_invalid",
            Self::Timer(_) => "timer",
            Self::UnwriteTimer => "unwrite_timer",
        }
    }
}

/// Payload of an `event` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Optional leading marker (`+`, `+/-`, a time of day).
    pub prefix: Option<String>,
    /// Exercise kind tag.
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    /// Exercise name.
    pub exercise: String,
    /// Repetitions or seconds, depending on `kind`.
    pub value: i64,
}

/// Payload of an `exercise` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Optional leading marker.
    pub prefix: Option<String>,
    /// Exercise name.
    pub name: String,
    /// Exercise kind tag.
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
}

/// Payload of an `input` directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPrompt {
    /// Prompt text.
    pub message: Option<String>,
    /// Any answer satisfies the request; no payload is validated.
    pub signal_only: bool,
    /// Enumerated choices, control options wrapped in angle brackets.
    pub options: Option<Vec<String>>,
}

/// Inbound record: the raw answer to the outstanding `input` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Raw input value.
    pub input: String,
}
