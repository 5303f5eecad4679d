//! Exercise kind tag shared by events, exercises, and the wire.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// How an exercise is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Counted repetitions.
    Rep,
    /// Held or performed for a duration, measured in seconds.
    Timed,
}

impl ExerciseKind {
    /// All kinds, in menu order.
    pub const ALL: [ExerciseKind; 2] = [ExerciseKind::Rep, ExerciseKind::Timed];

    /// Wire and display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rep => "rep",
            Self::Timed => "timed",
        }
    }

    /// Whether values of this kind are repetition counts.
    pub fn is_rep(self) -> bool {
        matches!(self, Self::Rep)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rep" => Ok(Self::Rep),
            "timed" => Ok(Self::Timed),
            other => Err(ProtocolError::UnknownKind(other.to_string())),
        }
    }
}
