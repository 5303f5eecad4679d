//! Domain model: configuration, exercises, events and session plans.

use chrono::{NaiveDate, NaiveDateTime};
use latian_proto::ExerciseKind;
use serde::{Deserialize, Serialize};

/// Timestamp format used in stored documents.
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Per-user runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Line left visible when the user leaves.
    pub exit_message: String,
    /// Repetition total at which a milestone is announced.
    pub milestone_reps: i64,
    /// Duration total (seconds) at which a milestone is announced.
    pub milestone_seconds: i64,
    /// Countdown before a timed exercise starts counting.
    pub timer_delay_seconds: i64,
    /// Whether the user has gone through `configure`.
    pub loaded: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exit_message: "cya".to_string(),
            milestone_reps: 100,
            milestone_seconds: 300,
            timer_delay_seconds: 5,
            loaded: false,
        }
    }
}

impl Config {
    /// Milestone for totals of the given kind.
    pub fn milestone(&self, kind: ExerciseKind) -> i64 {
        match kind {
            ExerciseKind::Rep => self.milestone_reps,
            ExerciseKind::Timed => self.milestone_seconds,
        }
    }
}

/// A named exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Counted in repetitions or seconds.
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    /// Display name, unique per kind.
    pub name: String,
}

impl Exercise {
    /// Build an exercise.
    pub fn new(kind: ExerciseKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }
}

/// Exercises every new user starts with.
pub fn default_exercises() -> Vec<Exercise> {
    vec![
        Exercise::new(ExerciseKind::Rep, "push up"),
        Exercise::new(ExerciseKind::Rep, "sit up"),
        Exercise::new(ExerciseKind::Timed, "plank"),
    ]
}

/// One logged performance of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Kind of the exercise performed.
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    /// Exercise name.
    pub exercise: String,
    /// Repetitions or seconds.
    pub value: i64,
    /// When it was logged, minute precision.
    #[serde(with = "when_format")]
    pub when: NaiveDateTime,
}

impl Event {
    /// Calendar day of the event.
    pub fn day(&self) -> NaiveDate {
        self.when.date()
    }

    /// Whether adding this event to `prev_total` crosses a multiple of the
    /// milestone for its kind.
    pub fn is_milestone(&self, prev_total: i64, config: &Config) -> bool {
        crosses_milestone(prev_total, self.value, config.milestone(self.kind))
    }
}

/// `floor(prev / m) < floor((prev + value) / m)`. A non-positive milestone
/// never triggers.
pub fn crosses_milestone(prev_total: i64, value: i64, milestone: i64) -> bool {
    if milestone <= 0 {
        return false;
    }
    prev_total.div_euclid(milestone) < (prev_total + value).div_euclid(milestone)
}

/// A preset series of exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    /// Plan name.
    pub name: String,
    /// Exercises, in the order they are run.
    pub exercises: Vec<Exercise>,
}

mod when_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::DATETIME_FORMAT;

    pub fn serialize<S: Serializer>(when: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&when.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(D::Error::custom)
    }
}
