//! Custom error types for labbook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Errors fall into three families that the UI must be able to tell apart:
//!
//! - Not-found: a group, version, or record id that does not exist
//! - Invalid-state: an operation rejected by the entry lock state machine
//!   ([`LabbookError::Locked`], [`LabbookError::AlreadyLocked`],
//!   [`LabbookError::NotLocked`]) — retrying the same call cannot succeed
//! - Storage faults: the underlying data or audit file could not be written;
//!   the whole operation is unwound and may be retried by the caller

use thiserror::Error;

/// The main error type for labbook operations
#[derive(Error, Debug)]
pub enum LabbookError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Entry is locked and cannot be modified
    #[error("Entry is locked and cannot be modified: {0}")]
    Locked(String),

    /// Entry is already locked; signing again would inflate the audit trail
    #[error("Entry is already signed and locked: {0}")]
    AlreadyLocked(String),

    /// Unlock requested on an entry that is not locked
    #[error("Entry is not locked: {0}")]
    NotLocked(String),

    /// Storage errors (data or audit file could not be durably written)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LabbookError {
    /// Create a "not found" error for protocol groups
    pub fn protocol_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Protocol",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a specific protocol version
    pub fn version_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Protocol version",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for reagents
    pub fn reagent_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Reagent",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for projects
    pub fn project_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for experiments
    pub fn experiment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Experiment",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a lock state machine rejection
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::Locked(_) | Self::AlreadyLocked(_) | Self::NotLocked(_)
        )
    }

    /// Check if this is a storage durability fault
    pub fn is_durability_fault(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LabbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LabbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for labbook operations
pub type LabbookResult<T> = Result<T, LabbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LabbookError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LabbookError::protocol_not_found("pro-12345678");
        assert_eq!(err.to_string(), "Protocol not found: pro-12345678");
        assert!(err.is_not_found());
        assert!(!err.is_invalid_state());
    }

    #[test]
    fn test_lock_errors_are_invalid_state() {
        assert!(LabbookError::Locked("ent-1".into()).is_invalid_state());
        assert!(LabbookError::AlreadyLocked("ent-1".into()).is_invalid_state());
        assert!(LabbookError::NotLocked("ent-1".into()).is_invalid_state());
        assert!(!LabbookError::Storage("disk full".into()).is_invalid_state());
    }

    #[test]
    fn test_locked_and_not_found_messages_distinguishable() {
        let locked = LabbookError::Locked("ent-12345678".into()).to_string();
        let missing = LabbookError::entry_not_found("ent-12345678").to_string();
        assert!(locked.contains("locked"));
        assert!(missing.contains("not found"));
        assert_ne!(locked, missing);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LabbookError = io_err.into();
        assert!(matches!(err, LabbookError::Io(_)));
        assert!(err.is_durability_fault());
    }
}
