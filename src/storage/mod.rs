//! Persistent key/value storage for the session.
//!
//! DESIGN
//! ======
//! Mirrors the browser's origin-scoped local storage: string keys, string
//! values, survives reloads. The session layer only ever touches
//! [`TOKEN_KEY`] and [`USER_KEY`]. Backends are swappable so tests get a
//! fresh [`MemoryStorage`] per case and native builds can persist to a file.

pub mod file;

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

use crate::error::StorageError;

pub use file::FileStorage;

/// Raw bearer token value.
pub const TOKEN_KEY: &str = "token";
/// JSON-encoded user record.
pub const USER_KEY: &str = "user";

/// Origin-scoped string key/value store.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with initial entries, as if left over from a previous run.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { entries: Mutex::new(entries) }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Read the persisted token, treating empty strings and read failures as absent.
pub(crate) fn read_token(storage: &dyn Storage) -> Option<String> {
    match storage.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted token");
            None
        }
    }
}

/// Remove both session keys, logging instead of failing.
pub(crate) fn clear_session_keys(storage: &dyn Storage) {
    for key in [TOKEN_KEY, USER_KEY] {
        if let Err(e) = storage.remove(key) {
            tracing::warn!(error = %e, key, "failed to remove persisted session key");
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
