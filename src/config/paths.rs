//! Path management for labbook
//!
//! Provides XDG-compliant path resolution for configuration, data files, and
//! the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `LABBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/labbook` or `~/.config/labbook`
//! 3. Windows: `%APPDATA%\labbook`

use std::path::PathBuf;

use crate::error::LabbookError;

/// Manages all paths used by labbook
#[derive(Debug, Clone)]
pub struct LabbookPaths {
    /// Base directory for all labbook data
    base_dir: PathBuf,
}

impl LabbookPaths {
    /// Create a new LabbookPaths instance
    ///
    /// Path resolution:
    /// 1. `LABBOOK_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/labbook` or `~/.config/labbook`
    /// 3. Windows: `%APPDATA%\labbook`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LabbookError> {
        let base_dir = if let Ok(custom) = std::env::var("LABBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LabbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/labbook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/labbook/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the append-only audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to protocols.json (all protocol version chains)
    pub fn protocols_file(&self) -> PathBuf {
        self.data_dir().join("protocols.json")
    }

    /// Get the path to entries.json
    pub fn entries_file(&self) -> PathBuf {
        self.data_dir().join("entries.json")
    }

    /// Get the path to reagents.json
    pub fn reagents_file(&self) -> PathBuf {
        self.data_dir().join("reagents.json")
    }

    /// Get the path to projects.json (projects and their experiments)
    pub fn projects_file(&self) -> PathBuf {
        self.data_dir().join("projects.json")
    }

    /// Ensure all required directories exist
    ///
    /// Creates:
    /// - Base directory (~/.config/labbook/)
    /// - Data directory (~/.config/labbook/data/)
    pub fn ensure_directories(&self) -> Result<(), LabbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LabbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LabbookError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if labbook has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LabbookError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("labbook"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LabbookError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LabbookError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("labbook"))
}
