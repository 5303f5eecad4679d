//! Append-only, line-indexed output log.

use crate::{Message, SessionError};

/// Ordered record of the messages currently visible to one user.
///
/// Mutated only by [`append`](Self::append) and
/// [`retract`](Self::retract). Entries are never edited in place. The log
/// belongs to exactly one session; nothing else appends to it.
///
/// # Invariants
///
/// - `appended()` never decreases
/// - `len() <= appended()`
#[derive(Debug, Default)]
pub struct OutputLog {
    entries: Vec<Message>,
    appended: u64,
}

impl OutputLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry. Always succeeds.
    pub fn append(&mut self, message: Message) {
        self.entries.push(message);
        self.appended += 1;

        debug_assert!(self.entries.len() as u64 <= self.appended);
    }

    /// Remove the last `count` entries.
    ///
    /// Retracting more entries than are visible is an invariant violation
    /// and leaves the log untouched.
    pub fn retract(&mut self, count: usize) -> Result<(), SessionError> {
        let available = self.entries.len();
        if count > available {
            return Err(SessionError::RetractionUnderflow { requested: count, available });
        }

        self.entries.truncate(available - count);
        Ok(())
    }

    /// Number of visible entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are visible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic count of entries appended since the log was created.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Visible entries, oldest first.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }
}
