//! Per-user storage.
//!
//! [`Storage`] is synchronous: backends load a user's whole document on
//! `connect` and persist it on `commit`. Each session owns its own storage
//! context; backends that share data between contexts (the in-memory
//! backend) only exchange it on `connect` and `commit`.

mod document;
mod error;
mod file;
mod ledger;
mod memory;

use std::sync::Arc;

pub use document::UserDocument;
pub use error::StorageError;
pub use file::FileStorage;
use latian_proto::ExerciseKind;
pub use ledger::Ledger;
pub use memory::MemoryStorage;

use crate::{
    Registry, Settings,
    model::{Config, Event, Exercise, SessionPlan},
};

/// Creates one fresh storage context per session.
pub type StorageFactory = Arc<dyn Fn() -> Box<dyn Storage> + Send + Sync>;

/// Builds a session factory from startup settings.
pub type StorageBackend = fn(&Settings) -> StorageFactory;

/// Storage backends by command-line name.
pub fn storage_backends() -> Registry<StorageBackend> {
    Registry::new()
        .register("file", file_backend as StorageBackend)
        .register("memory", memory_backend as StorageBackend)
}

fn file_backend(settings: &Settings) -> StorageFactory {
    let dest = settings.storage_dest.clone();
    Arc::new(move || -> Box<dyn Storage> { Box::new(FileStorage::new(dest.clone())) })
}

fn memory_backend(_: &Settings) -> StorageFactory {
    let store = MemoryStorage::new();
    Arc::new(move || -> Box<dyn Storage> { Box::new(store.context()) })
}

/// Storage context for one user.
///
/// Every accessor fails with [`StorageError::NotConnected`] before
/// [`connect`](Self::connect) and after [`disconnect`](Self::disconnect).
pub trait Storage: Send + Sync {
    /// Load the user's document, or start an empty one.
    fn connect(&mut self, user: &str) -> Result<(), StorageError>;

    /// Drop the loaded document without committing.
    fn disconnect(&mut self) -> Result<(), StorageError>;

    /// Persist the loaded document.
    fn commit(&mut self) -> Result<(), StorageError>;

    /// The user's configuration, if one was ever set.
    fn config(&self) -> Result<Option<Config>, StorageError>;

    /// Replace the user's configuration.
    fn set_config(&mut self, config: Config) -> Result<(), StorageError>;

    /// All events, in logging order.
    fn events(&self) -> Result<Vec<Event>, StorageError>;

    /// Log an event.
    fn push_event(&mut self, event: Event) -> Result<(), StorageError>;

    /// Exercises of one kind, in creation order.
    fn exercises(&self, kind: ExerciseKind) -> Result<Vec<Exercise>, StorageError>;

    /// Add an exercise.
    fn push_exercise(&mut self, exercise: Exercise) -> Result<(), StorageError>;

    /// All session plans, in creation order.
    fn session_plans(&self) -> Result<Vec<SessionPlan>, StorageError>;

    /// Add a session plan.
    fn push_session_plan(&mut self, plan: SessionPlan) -> Result<(), StorageError>;
}

/// Shared accessor plumbing for backends holding a [`UserDocument`].
pub(crate) trait DocumentBacked {
    fn document(&self) -> Option<&UserDocument>;
    fn document_mut(&mut self) -> Option<&mut UserDocument>;

    fn loaded(&self) -> Result<&UserDocument, StorageError> {
        self.document().ok_or(StorageError::NotConnected)
    }

    fn loaded_mut(&mut self) -> Result<&mut UserDocument, StorageError> {
        self.document_mut().ok_or(StorageError::NotConnected)
    }
}

/// Implements the collection accessors of [`Storage`] over a
/// [`DocumentBacked`] backend.
macro_rules! document_accessors {
    () => {
        fn config(&self) -> Result<Option<Config>, StorageError> {
            Ok(self.loaded()?.config.clone())
        }

        fn set_config(&mut self, config: Config) -> Result<(), StorageError> {
            self.loaded_mut()?.config = Some(config);
            Ok(())
        }

        fn events(&self) -> Result<Vec<Event>, StorageError> {
            Ok(self.loaded()?.events.clone())
        }

        fn push_event(&mut self, event: Event) -> Result<(), StorageError> {
            self.loaded_mut()?.events.push(event);
            Ok(())
        }

        fn exercises(&self, kind: ExerciseKind) -> Result<Vec<Exercise>, StorageError> {
            Ok(self.loaded()?.exercises.iter().filter(|e| e.kind == kind).cloned().collect())
        }

        fn push_exercise(&mut self, exercise: Exercise) -> Result<(), StorageError> {
            self.loaded_mut()?.exercises.push(exercise);
            Ok(())
        }

        fn session_plans(&self) -> Result<Vec<SessionPlan>, StorageError> {
            Ok(self.loaded()?.session_plans.clone())
        }

        fn push_session_plan(&mut self, plan: SessionPlan) -> Result<(), StorageError> {
            self.loaded_mut()?.session_plans.push(plan);
            Ok(())
        }
    };
}

pub(crate) use document_accessors;
