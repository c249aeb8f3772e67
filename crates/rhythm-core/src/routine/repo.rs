//! Routine repository.
//!
//! The whole collection is one JSON blob under one key, re-serialized
//! in full on every mutation. Unparseable stored data falls back to an
//! empty collection, silently; a failed write is surfaced to the caller.

use crate::error::{CoreError, Result, StorageError};
use crate::storage::database::{Database, ROUTINES_KEY};

use super::Routine;

/// Collection-of-routines repository over the key-value store.
pub struct RoutineRepo<'a> {
    db: &'a Database,
}

impl<'a> RoutineRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Load the full collection. Corrupt or missing data reads as empty.
    pub fn list(&self) -> Result<Vec<Routine>, StorageError> {
        let raw = self.db.kv_get(ROUTINES_KEY)?;
        Ok(raw
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Look up one routine by id.
    pub fn get(&self, id: &str) -> Result<Option<Routine>, StorageError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Persist the full collection in a single write.
    pub fn save_all(&self, routines: &[Routine]) -> Result<()> {
        let json = serde_json::to_string(routines)?;
        self.db.kv_set(ROUTINES_KEY, &json)?;
        Ok(())
    }

    /// Insert a new routine or replace the one with the same id,
    /// preserving collection order. Validates before anything is written.
    pub fn upsert(&self, routine: Routine) -> Result<Routine> {
        routine.validate().map_err(CoreError::Validation)?;
        let mut routines = self.list()?;
        match routines.iter_mut().find(|r| r.id == routine.id) {
            Some(slot) => *slot = routine.clone(),
            None => routines.push(routine.clone()),
        }
        self.save_all(&routines)?;
        Ok(routine)
    }

    /// Remove a routine. Returns false when the id is unknown; the
    /// remaining routines keep their order and field values.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let routines = self.list()?;
        let before = routines.len();
        let remaining: Vec<Routine> = routines.into_iter().filter(|r| r.id != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.save_all(&remaining)?;
        Ok(true)
    }
}
