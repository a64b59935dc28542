//! In-memory persistence for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Persist, PersistError};

/// A `HashMap`-backed [`Persist`] implementation. Nothing survives the
/// process; useful in tests and for "incognito" sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key, e.g. with a corrupt blob to exercise fail-soft loads.
    pub fn with_blob(self, key: &str, blob: &str) -> Self {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_owned(), blob.to_owned());
        }
        self
    }
}

impl Persist for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let blobs = self.blobs.lock().map_err(poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        let mut blobs = self.blobs.lock().map_err(poisoned)?;
        blobs.insert(key.to_owned(), blob.to_owned());
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> PersistError {
    PersistError::Io(std::io::Error::other("memory store lock poisoned"))
}
