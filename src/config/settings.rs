//! User settings for labbook
//!
//! Manages user preferences such as the default actor recorded on mutations
//! and the date format used for display.

use serde::{Deserialize, Serialize};

use super::paths::LabbookPaths;
use crate::error::LabbookError;

/// User settings for labbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Actor recorded on mutations when `--actor` is not given on the
    /// command line. Identity is an opaque string; there is no auth layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_actor: Option<String>,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_actor: None,
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LabbookPaths) -> Result<Self, LabbookError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LabbookError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LabbookError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Create default settings
            let settings = Settings::default();
            // Don't save yet - let caller decide when to persist
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LabbookPaths) -> Result<(), LabbookError> {
        // Ensure the config directory exists
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LabbookError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| LabbookError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Resolve the actor for a mutation: explicit flag wins, then the
    /// configured default.
    pub fn resolve_actor(&self, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.default_actor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert!(settings.default_actor.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LabbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_actor = Some("alice".to_string());

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_actor.as_deref(), Some("alice"));
    }

    #[test]
    fn test_resolve_actor() {
        let mut settings = Settings::default();
        assert_eq!(settings.resolve_actor(None), None);

        settings.default_actor = Some("alice".to_string());
        assert_eq!(settings.resolve_actor(None).as_deref(), Some("alice"));
        assert_eq!(
            settings.resolve_actor(Some("bob".to_string())).as_deref(),
            Some("bob")
        );
    }
}
