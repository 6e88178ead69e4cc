//! In-process session store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{SessionStore, SessionStoreError};

/// Session store holding values in a mutex-guarded map.
///
/// Useful for tests and for embedding the session manager in a single
/// process without persistence.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries().map_or(0, |entries| entries.len())
    }

    /// Whether no key is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, String> {
        self.entries
            .lock()
            .map_err(|_| "session store lock poisoned".to_owned())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let entries = self
            .entries()
            .map_err(|message| SessionStoreError::read(key, message))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries()
            .map_err(|message| SessionStoreError::write(key, message))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries()
            .map_err(|message| SessionStoreError::remove(key, message))?;
        entries.remove(key);
        Ok(())
    }
}
