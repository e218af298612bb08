//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod entry;
pub mod project;
pub mod protocol;
pub mod reagent;

pub use audit::{handle_audit_command, AuditArgs};
pub use entry::{handle_entry_command, EntryCommands};
pub use project::{handle_project_command, ProjectCommands};
pub use protocol::{handle_protocol_command, ProtocolCommands};
pub use reagent::{handle_reagent_command, ReagentCommands};

use crate::error::{LabbookError, LabbookResult};

/// Require a resolved actor identity for a mutating command
pub(crate) fn require_actor(actor: Option<&str>) -> LabbookResult<&str> {
    match actor {
        Some(actor) if !actor.trim().is_empty() => Ok(actor.trim()),
        _ => Err(LabbookError::Validation(
            "No actor identity. Pass --actor, set LABBOOK_ACTOR, or configure default_actor."
                .into(),
        )),
    }
}

/// Resolve body text from an inline flag or a file path
pub(crate) fn read_content(content: Option<String>, file: Option<String>) -> LabbookResult<String> {
    match (content, file) {
        (Some(content), _) => Ok(content),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| LabbookError::Io(format!("Failed to read '{}': {}", path, e))),
        (None, None) => Err(LabbookError::Validation(
            "No content given. Pass --content or --file.".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_actor() {
        assert_eq!(require_actor(Some("alice")).unwrap(), "alice");
        assert_eq!(require_actor(Some("  alice  ")).unwrap(), "alice");
        assert!(require_actor(Some("  ")).is_err());
        assert!(require_actor(None).is_err());
    }

    #[test]
    fn test_read_content_prefers_inline() {
        let content = read_content(Some("inline".into()), Some("/no/such/file".into())).unwrap();
        assert_eq!(content, "inline");
        assert!(read_content(None, None).is_err());
    }
}
