use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use latian_proto::ExerciseKind;

use super::{DocumentBacked, Storage, StorageError, UserDocument, document_accessors};
use crate::model::{Config, Event, Exercise, SessionPlan};

/// Suffix of per-user document files.
pub const FILE_SUFFIX: &str = ".db.json";

/// JSON file storage, one document per user at `<dest>/<user>.db.json`.
///
/// A missing file starts an empty document. Nothing touches the disk until
/// `commit`.
#[derive(Debug)]
pub struct FileStorage {
    dest: PathBuf,
    context: Option<(PathBuf, UserDocument)>,
}

impl FileStorage {
    /// Storage rooted at directory `dest`.
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into(), context: None }
    }

    /// Path of a user's document.
    pub fn path_for(&self, user: &str) -> Result<PathBuf, StorageError> {
        let valid = !user.is_empty()
            && user != "."
            && user != ".."
            && !user.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StorageError::InvalidUser(user.to_string()));
        }
        Ok(self.dest.join(format!("{user}{FILE_SUFFIX}")))
    }

    fn load(path: &Path) -> Result<UserDocument, StorageError> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(UserDocument::default()),
            Err(err) => Err(err.into()),
        }
    }
}

impl DocumentBacked for FileStorage {
    fn document(&self) -> Option<&UserDocument> {
        self.context.as_ref().map(|(_, document)| document)
    }

    fn document_mut(&mut self) -> Option<&mut UserDocument> {
        self.context.as_mut().map(|(_, document)| document)
    }
}

impl Storage for FileStorage {
    fn connect(&mut self, user: &str) -> Result<(), StorageError> {
        let path = self.path_for(user)?;
        let document = Self::load(&path)?;
        tracing::debug!(path = %path.display(), "storage connected");
        self.context = Some((path, document));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), StorageError> {
        self.context = None;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        let (path, document) = self.context.as_ref().ok_or(StorageError::NotConnected)?;
        let bytes = serde_json::to_vec(document)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    document_accessors!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_names_cannot_escape_dest() {
        let storage = FileStorage::new("/tmp/latian");
        assert!(storage.path_for("../etc/passwd").is_err());
        assert!(storage.path_for("").is_err());
        assert!(storage.path_for("..").is_err());
        assert_eq!(storage.path_for("ana").unwrap(), Path::new("/tmp/latian/ana.db.json"));
    }

    #[test]
    fn commit_requires_connection() {
        let mut storage = FileStorage::new(".");
        assert_eq!(storage.commit(), Err(StorageError::NotConnected));
    }
}
