use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::store::{ProgressError, ProgressStore};

/// SQLite-backed progress store
pub struct SqliteProgressStore {
    conn: Mutex<Connection>,
}

impl SqliteProgressStore {
    /// Open (or create) a progress store at the given path
    pub fn new(path: &Path) -> Result<Self, ProgressError> {
        let conn = Connection::open(path).map_err(|e| ProgressError::Database(e.to_string()))?;
        Self::init(conn)
    }

    /// Create an in-memory progress store (useful for testing)
    pub fn in_memory() -> Result<Self, ProgressError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ProgressError::Database(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, ProgressError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS progress (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ProgressError::Database(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ProgressStore for SqliteProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM progress WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| ProgressError::Database(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO progress (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| ProgressError::Database(e.to_string()))?;
        Ok(())
    }

    fn increment(&self, key: &str) -> Result<u64, ProgressError> {
        // Read-modify-write under the connection lock; the store has a single
        // writer so this is race-free.
        let conn = self.conn.lock().unwrap();
        let current: Option<String> = conn
            .query_row(
                "SELECT value FROM progress WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ProgressError::Database(e.to_string()))?;

        let next = current.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0) + 1;
        conn.execute(
            "INSERT INTO progress (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, next.to_string()],
        )
        .map_err(|e| ProgressError::Database(e.to_string()))?;

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::super::store::keys;
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let store = SqliteProgressStore::in_memory().unwrap();
        assert_eq!(store.get(keys::SEARCH_COUNT).unwrap(), None);

        store.set(keys::SEARCH_COUNT, "3").unwrap();
        assert_eq!(store.get(keys::SEARCH_COUNT).unwrap().as_deref(), Some("3"));

        store.set(keys::SEARCH_COUNT, "4").unwrap();
        assert_eq!(store.get(keys::SEARCH_COUNT).unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn test_increment() {
        let store = SqliteProgressStore::in_memory().unwrap();
        assert_eq!(store.increment(keys::DOWNLOAD_COUNT).unwrap(), 1);
        assert_eq!(store.increment(keys::DOWNLOAD_COUNT).unwrap(), 2);
        assert_eq!(
            store.get(keys::DOWNLOAD_COUNT).unwrap().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_increment_recovers_from_malformed_value() {
        let store = SqliteProgressStore::in_memory().unwrap();
        store.set(keys::DOWNLOAD_COUNT, "garbage").unwrap();
        assert_eq!(store.increment(keys::DOWNLOAD_COUNT).unwrap(), 1);
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.db");

        {
            let store = SqliteProgressStore::new(&path).unwrap();
            store.increment(keys::SEARCH_COUNT).unwrap();
        }

        let reopened = SqliteProgressStore::new(&path).unwrap();
        assert_eq!(
            reopened.get(keys::SEARCH_COUNT).unwrap().as_deref(),
            Some("1")
        );
    }
}
