//! Plain-text rendering of structured messages for line surfaces.

use latian_proto::{EventRecord, ExerciseRecord};

use crate::Message;

/// Column the event value is aligned to.
pub const EVENT_COLUMN: usize = 40;

/// Prefix marking a signed difference.
pub const SIGNED_PREFIX: &str = "+/-";

/// Duration as `<m>m<s>s`, negative values with a leading `-`.
pub fn format_duration(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    format!("{sign}{}m{}s", secs / 60, secs % 60)
}

/// Repetition count as `x<N>`, negative values with a leading `-`.
pub fn format_reps(count: i64) -> String {
    let sign = if count < 0 { "-" } else { "" };
    format!("{sign}x{}", count.unsigned_abs())
}

/// One event line.
pub fn render_event(event: &EventRecord) -> String {
    let label = format!("{} ({})", event.exercise, event.kind);
    let mut line = match &event.prefix {
        Some(prefix) => format!("{prefix} {label:<width$}", width = EVENT_COLUMN),
        None => format!("{label:<width$}", width = EVENT_COLUMN),
    };

    let value = if event.kind.is_rep() {
        format_reps(event.value)
    } else {
        format_duration(event.value)
    };
    if event.prefix.as_deref() == Some(SIGNED_PREFIX) && event.value >= 0 {
        line.push('+');
    }
    line.push_str(&value);
    line
}

/// One exercise line.
pub fn render_exercise(exercise: &ExerciseRecord) -> String {
    let label = format!("{} ({})", exercise.name, exercise.kind);
    match &exercise.prefix {
        Some(prefix) => format!("{prefix} {label}"),
        None => label,
    }
}

/// Text of any message as a line surface shows it.
pub fn render(message: &Message) -> String {
    match message {
        Message::Text(text) | Message::Prompt(text) => text.clone(),
        Message::Event(event) => render_event(event),
        Message::Exercise(exercise) => render_exercise(exercise),
    }
}

#[cfg(test)]
mod tests {
    use latian_proto::ExerciseKind;

    use super::*;

    fn event(prefix: Option<&str>, kind: ExerciseKind, value: i64) -> EventRecord {
        EventRecord { prefix: prefix.map(str::to_string), kind, exercise: "plank".into(), value }
    }

    #[test]
    fn durations_and_reps() {
        assert_eq!(format_duration(65), "1m5s");
        assert_eq!(format_duration(-65), "-1m5s");
        assert_eq!(format_reps(12), "x12");
        assert_eq!(format_reps(-3), "-x3");
    }

    #[test]
    fn event_value_is_aligned() {
        let line = render_event(&event(None, ExerciseKind::Timed, 90));
        assert_eq!(line, format!("{:<40}1m30s", "plank (timed)"));
    }

    #[test]
    fn prefix_precedes_padded_label() {
        let line = render_event(&event(Some("12:30"), ExerciseKind::Rep, 10));
        assert_eq!(line, format!("12:30 {:<40}x10", "plank (rep)"));
    }

    #[test]
    fn signed_prefix_marks_non_negative_values() {
        let gain = render_event(&event(Some(SIGNED_PREFIX), ExerciseKind::Rep, 4));
        let loss = render_event(&event(Some(SIGNED_PREFIX), ExerciseKind::Rep, -4));
        assert!(gain.ends_with("+x4"));
        assert!(loss.ends_with(" -x4"));
    }

    #[test]
    fn exercise_line() {
        let record = ExerciseRecord { prefix: Some("next".into()), name: "sit up".into(), kind: ExerciseKind::Rep };
        assert_eq!(render_exercise(&record), "next sit up (rep)");
    }
}
