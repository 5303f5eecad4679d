//! Performing one exercise and logging the result.

use chrono::Local;
use latian_core::{Console, SessionError};
use tokio::time::Instant;

use crate::{
    model::{Event, Exercise},
    storage::{Ledger, Storage},
};

/// Prefix of freshly logged event lines.
const LOGGED_PREFIX: &str = "+";

/// Measure one exercise, announce milestones, and store the event.
///
/// Reps are read as a positive count. Timed exercises show a timer with the
/// configured lead-in until the user signals; the lead-in is not counted.
/// Non-positive results are discarded.
///
/// Takes the console separately from storage so callers can pass an open
/// write scope.
pub(super) async fn run_exercise(
    console: &mut Console,
    storage: &mut dyn Storage,
    exercise: &Exercise,
) -> Result<(), SessionError> {
    let config = Ledger::new(storage).config()?;

    let value = if exercise.kind.is_rep() {
        console.read_int(Some("how many?"), 1, None).await?
    } else {
        let lead_in = config.timer_delay_seconds;
        let start = Instant::now();
        let timer = console.start_timer(lead_in);
        console.read_signal(None).await?;
        timer.stop();
        start.elapsed().as_secs() as i64 - lead_in
    };
    if value <= 0 {
        tracing::debug!(exercise = %exercise.name, value, "discarding non-positive result");
        return Ok(());
    }

    let event = Event {
        kind: exercise.kind,
        exercise: exercise.name.clone(),
        value,
        when: Local::now().naive_local(),
    };

    let total = Ledger::new(storage).total(exercise, None)?;
    if event.is_milestone(total, &config) {
        let label = format!("milestone {}!", exercise.name);
        console.write_event(exercise.kind, &label, total + value, Some(LOGGED_PREFIX))?;
    }
    console.write_event(exercise.kind, &exercise.name, value, Some(LOGGED_PREFIX))?;

    storage.push_event(event)?;
    storage.commit()?;
    Ok(())
}
