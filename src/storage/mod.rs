//! Storage layer for labbook
//!
//! Provides JSON file storage with atomic writes, per-entity mutation locks,
//! and automatic directory creation. Repositories hold the working state in
//! memory and persist whole files atomically (temp file + rename).

pub mod entries;
pub mod file_io;
pub mod locks;
pub mod projects;
pub mod protocols;
pub mod reagents;

pub use entries::EntryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use locks::EntityLocks;
pub use projects::ProjectRepository;
pub use protocols::ProtocolRepository;
pub use reagents::ReagentRepository;

use crate::config::paths::LabbookPaths;
use crate::error::LabbookError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LabbookPaths,
    pub protocols: ProtocolRepository,
    pub entries: EntryRepository,
    pub reagents: ReagentRepository,
    pub projects: ProjectRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LabbookPaths) -> Result<Self, LabbookError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            protocols: ProtocolRepository::new(paths.protocols_file()),
            entries: EntryRepository::new(paths.entries_file()),
            reagents: ReagentRepository::new(paths.reagents_file()),
            projects: ProjectRepository::new(paths.projects_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LabbookPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LabbookError> {
        self.protocols.load()?;
        self.entries.load()?;
        self.reagents.load()?;
        self.projects.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LabbookError> {
        self.protocols.save()?;
        self.entries.save()?;
        self.reagents.save()?;
        self.projects.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LabbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
        storage.save_all().unwrap();
    }
}
