use serde::{Deserialize, Serialize};

use crate::model::{Config, Event, Exercise, SessionPlan};

/// Everything stored for one user.
///
/// Serialized as one JSON object with a collection per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Configuration, once set.
    #[serde(default)]
    pub config: Option<Config>,
    /// Logged events.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Known exercises of every kind.
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Session plans.
    #[serde(default)]
    pub session_plans: Vec<SessionPlan>,
}
