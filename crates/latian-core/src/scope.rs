//! Scoped write regions.

use std::ops::{Deref, DerefMut};

use crate::Console;

/// Write region guard.
///
/// Every message written through the guard is counted against this region,
/// except those written inside a nested region. When
/// the guard drops, exactly that many messages are retracted, unless the
/// console has been terminated: a leaving user keeps the final screen.
///
/// Nested scopes are taken by reborrowing, so an inner region always closes
/// (and retracts) before its outer region.
///
/// ```ignore
/// let mut outer = console.scope();
/// outer.write_message("heading")?;
/// {
///     let mut inner = outer.scope();
///     inner.write_message("detail")?;
/// } // "detail" retracted
/// // "heading" retracted when `outer` drops
/// ```
pub struct WriteScope<'a> {
    console: &'a mut Console,
    depth: usize,
}

impl<'a> WriteScope<'a> {
    pub(crate) fn open(console: &'a mut Console) -> Self {
        let depth = console.push_frame();
        Self { console, depth }
    }

    /// Messages written inside this region that are still visible.
    pub fn written(&self) -> usize {
        self.console.frame_count(self.depth)
    }
}

impl Deref for WriteScope<'_> {
    type Target = Console;

    fn deref(&self) -> &Console {
        self.console
    }
}

impl DerefMut for WriteScope<'_> {
    fn deref_mut(&mut self) -> &mut Console {
        self.console
    }
}

impl Drop for WriteScope<'_> {
    fn drop(&mut self) {
        let count = self.console.pop_frame(self.depth);
        if self.console.is_terminated() || count == 0 {
            return;
        }

        if let Err(err) = self.console.retract_untracked(count) {
            tracing::error!(%err, count, "write scope failed to retract on close");
        }
    }
}
