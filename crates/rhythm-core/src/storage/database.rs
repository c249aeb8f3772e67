//! SQLite-backed key-value store.
//!
//! Everything the application persists is a JSON blob under a string
//! key, read-modify-write with no transaction guard. Two concurrent
//! processes racing on a save is last-writer-wins.

use rusqlite::{params, Connection};

use crate::error::StorageError;

use super::data_dir;

/// Key under which the routine collection is stored.
pub const ROUTINES_KEY: &str = "routine_tracker_data";
/// Key under which the habit item collection is stored.
pub const HABIT_ITEMS_KEY: &str = "habit_items";
/// Key under which the habit event log is stored.
pub const HABIT_LOGS_KEY: &str = "habit_logs";
/// Key under which an in-progress routine run is stored.
pub const ACTIVE_RUN_KEY: &str = "active_run";

/// Key-value store over a single SQLite table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the store at `<data dir>/rhythm.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("rhythm.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(StorageError::write)
    }

    /// Get a value from the store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(StorageError::read)?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::read(e)),
        }
    }

    /// Set a value in the store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(StorageError::write)?;
        Ok(())
    }

    /// Remove a key from the store. Missing keys are not an error.
    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(StorageError::write)?;
        Ok(())
    }
}
