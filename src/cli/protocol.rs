//! Protocol CLI commands
//!
//! Implements CLI commands for protocol version chains: create, edit (which
//! appends a new version), history, diff, and restore.

use clap::Subcommand;

use crate::audit::AuditSink;
use crate::display::protocol::{
    format_diff, format_protocol_details, format_protocol_list, format_version_history,
};
use crate::error::LabbookResult;
use crate::models::ProtocolGroupId;
use crate::services::ProtocolService;
use crate::storage::Storage;

use super::{read_content, require_actor};

/// Protocol subcommands
#[derive(Subcommand)]
pub enum ProtocolCommands {
    /// Create a new protocol (version 1)
    Create {
        /// Protocol title
        title: String,
        /// Protocol body text
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the protocol body from a file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Commit an edit as a new version
    Edit {
        /// Protocol group ID
        group: ProtocolGroupId,
        /// New title (defaults to the current title)
        #[arg(short, long)]
        title: Option<String>,
        /// New body text
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the new body from a file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// List protocols (current version of each group)
    List,
    /// Show a protocol version (current by default)
    Show {
        /// Protocol group ID
        group: ProtocolGroupId,
        /// Version number to show instead of the current one
        #[arg(short, long)]
        version: Option<u32>,
    },
    /// Show the full version history of a protocol
    History {
        /// Protocol group ID
        group: ProtocolGroupId,
    },
    /// Compare two versions of a protocol line by line
    Diff {
        /// Protocol group ID
        group: ProtocolGroupId,
        /// Older version number
        from: u32,
        /// Newer version number
        to: u32,
    },
    /// Restore a prior version's content as a new current version
    Restore {
        /// Protocol group ID
        group: ProtocolGroupId,
        /// Version number to restore
        version: u32,
    },
}

/// Handle a protocol command
pub fn handle_protocol_command(
    storage: &Storage,
    audit: &dyn AuditSink,
    actor: Option<&str>,
    cmd: ProtocolCommands,
) -> LabbookResult<()> {
    let service = ProtocolService::new(storage, audit);

    match cmd {
        ProtocolCommands::Create {
            title,
            content,
            file,
        } => {
            let actor = require_actor(actor)?;
            let content = read_content(content, file)?;
            let version = service.create(&title, &content, actor)?;

            println!("Created protocol: {}", version.title);
            println!("  Group ID: {}", version.group_id);
            println!("  Version:  {}", version.version);
        }

        ProtocolCommands::Edit {
            group,
            title,
            content,
            file,
        } => {
            let actor = require_actor(actor)?;
            let current = service.current(group)?;
            let title = title.unwrap_or(current.title);
            let content = match (content, file) {
                (None, None) => current.content,
                (content, file) => read_content(content, file)?,
            };

            let version = service.commit_edit(group, &title, &content, actor)?;
            println!(
                "Committed version {} of '{}'",
                version.version, version.title
            );
        }

        ProtocolCommands::List => {
            let protocols = service.list()?;
            print!("{}", format_protocol_list(&protocols));
        }

        ProtocolCommands::Show { group, version } => {
            let version = match version {
                Some(number) => service.get_version(group, number)?,
                None => service.current(group)?,
            };
            print!("{}", format_protocol_details(&version));
        }

        ProtocolCommands::History { group } => {
            let versions = service.list_versions(group)?;
            print!("{}", format_version_history(&versions));
        }

        ProtocolCommands::Diff { group, from, to } => {
            let diff = service.diff(group, from, to)?;
            print!("{}", format_diff(&diff));
        }

        ProtocolCommands::Restore { group, version } => {
            let actor = require_actor(actor)?;
            let restored = service.restore(group, version, actor)?;
            println!(
                "Restored version {} as new version {} of '{}'",
                version, restored.version, restored.title
            );
        }
    }

    Ok(())
}
