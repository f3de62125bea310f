//! Progress storage trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Well-known progress keys.
///
/// Counter values are string-encoded integers; list values are JSON.
pub mod keys {
    pub const SEARCH_COUNT: &str = "evolibrary_search_count";
    pub const DOWNLOAD_COUNT: &str = "evolibrary_download_count";
    pub const RECENT_SEARCHES: &str = "evolibrary_recent_searches";
    pub const ACHIEVEMENTS: &str = "evolibrary_achievements";
    pub const LAST_STAGE: &str = "evolibrary_last_morpho_stage";
}

/// Errors from progress storage backends.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for progress storage backends.
///
/// A flat string key-value store; the typed view lives in
/// [`ProgressTracker`](super::ProgressTracker).
pub trait ProgressStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, ProgressError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), ProgressError>;

    /// Increment a string-encoded integer counter, returning the new value.
    ///
    /// A missing or malformed value counts as zero.
    fn increment(&self, key: &str) -> Result<u64, ProgressError>;
}

/// In-memory progress store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryProgressStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn increment(&self, key: &str) -> Result<u64, ProgressError> {
        let mut values = self.values.lock().unwrap();
        let current: u64 = values
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let next = current + 1;
        values.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryProgressStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let store = MemoryProgressStore::new();
        store.set(keys::SEARCH_COUNT, "5").unwrap();
        assert_eq!(store.get(keys::SEARCH_COUNT).unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn test_increment_from_missing() {
        let store = MemoryProgressStore::new();
        assert_eq!(store.increment(keys::DOWNLOAD_COUNT).unwrap(), 1);
        assert_eq!(store.increment(keys::DOWNLOAD_COUNT).unwrap(), 2);
    }

    #[test]
    fn test_increment_treats_malformed_as_zero() {
        let store = MemoryProgressStore::new();
        store.set(keys::SEARCH_COUNT, "not a number").unwrap();
        assert_eq!(store.increment(keys::SEARCH_COUNT).unwrap(), 1);
    }
}
