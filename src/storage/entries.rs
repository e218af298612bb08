//! Entry repository for JSON storage
//!
//! Manages loading and saving entries to entries.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::LabbookError;
use crate::models::{Entry, EntryId};

use super::file_io::{read_json, write_json_atomic};
use super::locks::EntityLocks;

/// Serializable entry data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<Entry>,
}

/// Repository for entry persistence
pub struct EntryRepository {
    path: PathBuf,
    data: RwLock<HashMap<EntryId, Entry>>,
    /// Per-entry mutation locks
    locks: EntityLocks<EntryId>,
}

impl EntryRepository {
    /// Create a new entry repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            locks: EntityLocks::new(),
        }
    }

    /// Get the mutation lock for an entry
    pub fn entry_lock(&self, id: EntryId) -> Result<Arc<Mutex<()>>, LabbookError> {
        self.locks.acquire(id)
    }

    /// Load entries from disk
    pub fn load(&self) -> Result<(), LabbookError> {
        let file_data: EntryData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for entry in file_data.entries {
            data.insert(entry.id, entry);
        }

        Ok(())
    }

    /// Save entries to disk
    pub fn save(&self) -> Result<(), LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let file_data = EntryData { entries };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an entry by ID
    pub fn get(&self, id: EntryId) -> Result<Option<Entry>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// Get all entries, newest first
    pub fn get_all(&self) -> Result<Vec<Entry>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    /// Insert or replace an entry
    pub fn upsert(&self, entry: Entry) -> Result<(), LabbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(entry.id, entry);
        Ok(())
    }

    /// Remove an entry (unwind path for a staged create whose audit failed)
    pub fn remove(&self, id: EntryId) -> Result<(), LabbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.remove(&id);
        Ok(())
    }

    /// Check whether any entry links the given reagent
    pub fn any_links_reagent(
        &self,
        reagent_id: crate::models::ReagentId,
    ) -> Result<bool, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .values()
            .any(|entry| entry.find_link(reagent_id).is_some()))
    }
}
