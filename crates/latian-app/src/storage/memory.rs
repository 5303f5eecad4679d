use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use latian_proto::ExerciseKind;

use super::{DocumentBacked, Storage, StorageError, UserDocument, document_accessors};
use crate::model::{Config, Event, Exercise, SessionPlan};

/// In-memory storage.
///
/// Clones share one committed store keyed by user, but each clone is its own
/// storage context: it works on a private copy of the user's document taken
/// at `connect`, published back on `commit`. Nothing survives the process.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    committed: Arc<Mutex<HashMap<String, UserDocument>>>,
    context: Option<(String, UserDocument)>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, disconnected context onto the same store.
    pub fn context(&self) -> Self {
        Self { committed: Arc::clone(&self.committed), context: None }
    }

    /// Number of users with committed documents.
    pub fn user_count(&self) -> usize {
        self.committed.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl DocumentBacked for MemoryStorage {
    fn document(&self) -> Option<&UserDocument> {
        self.context.as_ref().map(|(_, document)| document)
    }

    fn document_mut(&mut self) -> Option<&mut UserDocument> {
        self.context.as_mut().map(|(_, document)| document)
    }
}

impl Storage for MemoryStorage {
    fn connect(&mut self, user: &str) -> Result<(), StorageError> {
        let document = self
            .committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user)
            .cloned()
            .unwrap_or_default();
        self.context = Some((user.to_string(), document));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), StorageError> {
        self.context = None;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        let (user, document) = self.context.as_ref().ok_or(StorageError::NotConnected)?;
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.clone(), document.clone());
        Ok(())
    }

    document_accessors!();
}
