//! Protocol repository for JSON storage
//!
//! Manages the version chains in protocols.json. Versions are immutable
//! records keyed by (group id, version number); the repository only ever
//! appends to a chain or swaps the group's current pointer. `replace_group`
//! exists solely to unwind a staged append whose audit event failed to land.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::LabbookError;
use crate::models::{ProtocolGroupId, ProtocolVersion};

use super::file_io::{read_json, write_json_atomic};
use super::locks::EntityLocks;

/// Serializable protocol data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ProtocolData {
    versions: Vec<ProtocolVersion>,
}

/// Repository for protocol version chains
pub struct ProtocolRepository {
    path: PathBuf,
    /// group id -> versions, kept sorted ascending by version number
    data: RwLock<HashMap<ProtocolGroupId, Vec<ProtocolVersion>>>,
    /// Per-group mutation locks
    locks: EntityLocks<ProtocolGroupId>,
}

impl ProtocolRepository {
    /// Create a new protocol repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            locks: EntityLocks::new(),
        }
    }

    /// Get the mutation lock for a group
    ///
    /// Held by callers for the whole read-modify-write span: version-number
    /// allocation, persistence, and audit emission.
    pub fn group_lock(&self, group_id: ProtocolGroupId) -> Result<Arc<Mutex<()>>, LabbookError> {
        self.locks.acquire(group_id)
    }

    /// Load version chains from disk
    pub fn load(&self) -> Result<(), LabbookError> {
        let file_data: ProtocolData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for version in file_data.versions {
            data.entry(version.group_id).or_default().push(version);
        }
        for chain in data.values_mut() {
            chain.sort_by_key(|v| v.version);
        }

        Ok(())
    }

    /// Save all version chains to disk
    pub fn save(&self) -> Result<(), LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut versions: Vec<_> = data.values().flatten().cloned().collect();
        versions.sort_by(|a, b| {
            a.group_id
                .as_uuid()
                .cmp(b.group_id.as_uuid())
                .then(a.version.cmp(&b.version))
        });

        let file_data = ProtocolData { versions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Check whether a group exists
    pub fn group_exists(&self, group_id: ProtocolGroupId) -> Result<bool, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.contains_key(&group_id))
    }

    /// Get all versions of a group, ascending by version number
    pub fn get_group(
        &self,
        group_id: ProtocolGroupId,
    ) -> Result<Option<Vec<ProtocolVersion>>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&group_id).cloned())
    }

    /// Get a single version of a group
    pub fn get_version(
        &self,
        group_id: ProtocolGroupId,
        version: u32,
    ) -> Result<Option<ProtocolVersion>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .get(&group_id)
            .and_then(|chain| chain.iter().find(|v| v.version == version).cloned()))
    }

    /// Get the current version of a group
    pub fn current_version(
        &self,
        group_id: ProtocolGroupId,
    ) -> Result<Option<ProtocolVersion>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .get(&group_id)
            .and_then(|chain| chain.iter().find(|v| v.is_current).cloned()))
    }

    /// Get the highest version number ever issued for a group
    pub fn highest_version(
        &self,
        group_id: ProtocolGroupId,
    ) -> Result<Option<u32>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .get(&group_id)
            .and_then(|chain| chain.iter().map(|v| v.version).max()))
    }

    /// Get the current version of every group (for listings)
    pub fn current_of_all_groups(&self) -> Result<Vec<ProtocolVersion>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut current: Vec<_> = data
            .values()
            .filter_map(|chain| chain.iter().find(|v| v.is_current).cloned())
            .collect();
        current.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(current)
    }

    /// Append a version to its group's chain and make it current
    ///
    /// Prior versions are untouched except for clearing their current flag.
    pub fn append_version(&self, version: ProtocolVersion) -> Result<(), LabbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let chain = data.entry(version.group_id).or_default();
        for existing in chain.iter_mut() {
            existing.is_current = false;
        }
        chain.push(version);
        Ok(())
    }

    /// Replace a group's entire chain (None removes the group)
    ///
    /// Unwind path only: used to restore a pre-mutation snapshot when the
    /// audit event for a staged append could not be recorded.
    pub fn replace_group(
        &self,
        group_id: ProtocolGroupId,
        chain: Option<Vec<ProtocolVersion>>,
    ) -> Result<(), LabbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match chain {
            Some(versions) => {
                data.insert(group_id, versions);
            }
            None => {
                data.remove(&group_id);
            }
        }
        Ok(())
    }
}
