//! Dialog actions offered from the main menu.
//!
//! Each action runs against a session's [`Context`] and returns
//! [`SessionError::Reset`] when the user cancels, which unwinds the action's
//! write scopes and returns to the menu.

mod add_exercise;
mod configure;
mod exercise;
mod free_session;
mod plan_session;
mod planned_session;
mod report;

use std::sync::Arc;

pub use add_exercise::AddExercise;
use async_trait::async_trait;
pub use configure::Configure;
pub use free_session::FreeSession;
use latian_core::{Console, SessionError};
use latian_proto::ExerciseKind;
pub use plan_session::PlanSession;
pub use planned_session::PlannedSession;
use rand::seq::SliceRandom;
pub use report::ViewReport;

use crate::{
    registry::Registry,
    storage::{Ledger, Storage},
};

/// Menu name of the configuration action, also run for new users.
pub const CONFIGURE: &str = "configure";

/// Control option leaving the current selection.
pub const BACK: &str = "back";

/// Control option finishing the current list.
pub const DONE: &str = "done";

/// Control option abandoning the current action.
pub const CANCEL: &str = "cancel";

/// Everything an action operates on: one user's console and storage.
pub struct Context {
    /// The session's console.
    pub console: Console,
    /// The session's storage context.
    pub storage: Box<dyn Storage>,
}

impl Context {
    /// Pair a console with a storage context.
    pub fn new(console: Console, storage: Box<dyn Storage>) -> Self {
        Self { console, storage }
    }

    /// Domain queries over this context's storage.
    pub fn ledger(&self) -> Ledger<'_> {
        Ledger::new(self.storage.as_ref())
    }
}

/// One menu entry.
#[async_trait]
pub trait Action: Send + Sync {
    /// Run the dialog to completion.
    async fn run(&self, ctx: &mut Context) -> Result<(), SessionError>;
}

/// Actions by menu name.
pub type ActionRegistry = Registry<Arc<dyn Action>>;

/// The standard menu, in display order.
pub fn default_actions() -> ActionRegistry {
    Registry::new()
        .register("start session", Arc::new(FreeSession) as Arc<dyn Action>)
        .register("start planned session", Arc::new(PlannedSession))
        .register("plan session", Arc::new(PlanSession))
        .register("view report", Arc::new(ViewReport))
        .register("add exercise", Arc::new(AddExercise))
        .register(CONFIGURE, Arc::new(Configure))
}

/// Kind names as offered in menus.
fn kind_names() -> Vec<String> {
    ExerciseKind::ALL.iter().map(|kind| kind.as_str().to_string()).collect()
}

/// Uniform random pick.
fn pick<T: Clone>(items: &[T]) -> Option<T> {
    items.choose(&mut rand::thread_rng()).cloned()
}
