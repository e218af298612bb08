//! Reagent repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LabbookError;
use crate::models::{Reagent, ReagentId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable reagent data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ReagentData {
    reagents: Vec<Reagent>,
}

/// Repository for reagent persistence
pub struct ReagentRepository {
    path: PathBuf,
    data: RwLock<HashMap<ReagentId, Reagent>>,
}

impl ReagentRepository {
    /// Create a new reagent repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load reagents from disk
    pub fn load(&self) -> Result<(), LabbookError> {
        let file_data: ReagentData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for reagent in file_data.reagents {
            data.insert(reagent.id, reagent);
        }

        Ok(())
    }

    /// Save reagents to disk
    pub fn save(&self) -> Result<(), LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut reagents: Vec<_> = data.values().cloned().collect();
        reagents.sort_by(|a, b| a.name.cmp(&b.name));

        let file_data = ReagentData { reagents };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a reagent by ID
    pub fn get(&self, id: ReagentId) -> Result<Option<Reagent>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// Check whether a reagent exists
    pub fn exists(&self, id: ReagentId) -> Result<bool, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.contains_key(&id))
    }

    /// Get all reagents, sorted by name
    pub fn get_all(&self) -> Result<Vec<Reagent>, LabbookError> {
        let data = self
            .data
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut reagents: Vec<_> = data.values().cloned().collect();
        reagents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(reagents)
    }

    /// Insert or replace a reagent
    pub fn upsert(&self, reagent: Reagent) -> Result<(), LabbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(reagent.id, reagent);
        Ok(())
    }

    /// Remove a reagent
    pub fn remove(&self, id: ReagentId) -> Result<(), LabbookError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ReagentRepository::new(temp_dir.path().join("reagents.json"));

        let reagent = Reagent::new("Taq polymerase");
        let id = reagent.id;

        repo.upsert(reagent).unwrap();
        assert!(repo.exists(id).unwrap());
        assert_eq!(repo.get(id).unwrap().unwrap().name, "Taq polymerase");

        repo.remove(id).unwrap();
        assert!(!repo.exists(id).unwrap());
    }

    #[test]
    fn test_get_all_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let repo = ReagentRepository::new(temp_dir.path().join("reagents.json"));

        repo.upsert(Reagent::new("Zinc chloride")).unwrap();
        repo.upsert(Reagent::new("Agarose")).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].name, "Agarose");
        assert_eq!(all[1].name, "Zinc chloride");
    }
}
