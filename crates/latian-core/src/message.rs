//! Messages recorded in the output log.

use latian_proto::{EventRecord, ExerciseKind, ExerciseRecord};

/// One already-formatted entry shown to the user.
///
/// Immutable once written. Transports decide how each kind is rendered: the
/// terminal renders structured records to text, the channel forwards them as
/// structured directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Plain text line.
    Text(String),
    /// Exercise event with a value.
    Event(EventRecord),
    /// Exercise description.
    Exercise(ExerciseRecord),
    /// Transient prompt glyph, completed by the user's own input line.
    Prompt(String),
}

impl Message {
    /// Build an event message.
    pub fn event(
        kind: ExerciseKind,
        exercise: impl Into<String>,
        value: i64,
        prefix: Option<&str>,
    ) -> Self {
        Self::Event(EventRecord {
            prefix: prefix.map(str::to_string),
            kind,
            exercise: exercise.into(),
            value,
        })
    }

    /// Build an exercise message.
    pub fn exercise(kind: ExerciseKind, name: impl Into<String>, prefix: Option<&str>) -> Self {
        Self::Exercise(ExerciseRecord { prefix: prefix.map(str::to_string), name: name.into(), kind })
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
