use chrono::NaiveDate;
use latian_proto::ExerciseKind;

use super::{Storage, StorageError};
use crate::model::{Config, Event, Exercise};

/// Domain queries over a storage context.
pub struct Ledger<'a> {
    storage: &'a dyn Storage,
}

impl<'a> Ledger<'a> {
    /// Query `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Configuration, falling back to defaults if none was set.
    pub fn config(&self) -> Result<Config, StorageError> {
        Ok(self.storage.config()?.unwrap_or_default())
    }

    /// Events logged on `day`, or all events.
    pub fn events(&self, day: Option<NaiveDate>) -> Result<Vec<Event>, StorageError> {
        let mut events = self.storage.events()?;
        if let Some(day) = day {
            events.retain(|event| event.day() == day);
        }
        Ok(events)
    }

    /// Sum of values logged for one exercise, optionally on one day only.
    pub fn total(&self, exercise: &Exercise, day: Option<NaiveDate>) -> Result<i64, StorageError> {
        Ok(self
            .events(day)?
            .iter()
            .filter(|event| event.kind == exercise.kind && event.exercise == exercise.name)
            .map(|event| event.value)
            .sum())
    }

    /// Per-exercise totals for one kind, in exercise creation order.
    pub fn totals(
        &self,
        kind: ExerciseKind,
        day: Option<NaiveDate>,
    ) -> Result<Vec<(Exercise, i64)>, StorageError> {
        let events = self.events(day)?;
        Ok(self
            .storage
            .exercises(kind)?
            .into_iter()
            .map(|exercise| {
                let total = events
                    .iter()
                    .filter(|e| e.kind == exercise.kind && e.exercise == exercise.name)
                    .map(|e| e.value)
                    .sum();
                (exercise, total)
            })
            .collect())
    }
}
