//! Entry CLI commands
//!
//! Implements CLI commands for lockable entries: create, edit, sign, unlock,
//! and reagent links. Signing requires the explicit `--yes` flag.

use clap::Subcommand;

use crate::audit::AuditSink;
use crate::display::entry::{format_entry_details, format_entry_list};
use crate::error::LabbookResult;
use crate::models::{EntryId, ReagentId};
use crate::services::EntryService;
use crate::storage::Storage;

use super::{read_content, require_actor};

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Create a new draft entry
    Create {
        /// Entry title
        title: String,
        /// Entry body text
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the entry body from a file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// List all entries
    List,
    /// Show an entry's details
    Show {
        /// Entry ID
        entry: EntryId,
    },
    /// Edit a draft entry
    Edit {
        /// Entry ID
        entry: EntryId,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New body text
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the new body from a file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Sign an entry, locking it against further edits
    Sign {
        /// Entry ID
        entry: EntryId,
        /// Confirm the signature (required)
        #[arg(short, long)]
        yes: bool,
    },
    /// Unlock a signed entry, returning it to draft
    Unlock {
        /// Entry ID
        entry: EntryId,
    },
    /// Link a reagent to a draft entry
    Link {
        /// Entry ID
        entry: EntryId,
        /// Reagent ID
        reagent: ReagentId,
        /// Quantity consumed
        #[arg(short, long)]
        quantity: Option<f64>,
        /// Unit for the quantity (mg, mL, ...)
        #[arg(short, long, default_value = "")]
        unit: String,
        /// Usage notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Remove a reagent link from a draft entry
    Unlink {
        /// Entry ID
        entry: EntryId,
        /// Reagent ID
        reagent: ReagentId,
    },
}

/// Handle an entry command
pub fn handle_entry_command(
    storage: &Storage,
    audit: &dyn AuditSink,
    actor: Option<&str>,
    cmd: EntryCommands,
) -> LabbookResult<()> {
    let service = EntryService::new(storage, audit);

    match cmd {
        EntryCommands::Create {
            title,
            content,
            file,
        } => {
            let actor = require_actor(actor)?;
            let content = match (content, file) {
                (None, None) => String::new(),
                (content, file) => read_content(content, file)?,
            };
            let entry = service.create(&title, &content, actor)?;

            println!("Created entry: {}", entry.title);
            println!("  ID:     {}", entry.id);
            println!("  Status: {}", entry.status);
        }

        EntryCommands::List => {
            let entries = service.list()?;
            print!("{}", format_entry_list(&entries));
        }

        EntryCommands::Show { entry } => {
            let entry = service.get(entry)?;
            let reagents = storage.reagents.get_all()?;
            print!("{}", format_entry_details(&entry, &reagents));
        }

        EntryCommands::Edit {
            entry,
            title,
            content,
            file,
        } => {
            let actor = require_actor(actor)?;
            let content = match (content, file) {
                (None, None) => None,
                (content, file) => Some(read_content(content, file)?),
            };
            let updated = service.edit(entry, title, content, actor)?;
            println!("Updated entry: {}", updated.title);
        }

        EntryCommands::Sign { entry, yes } => {
            let actor = require_actor(actor)?;
            let signed = service.sign(entry, actor, yes)?;
            println!(
                "Signed entry '{}' as {}. It is now locked.",
                signed.title, actor
            );
        }

        EntryCommands::Unlock { entry } => {
            let actor = require_actor(actor)?;
            let unlocked = service.unlock(entry, actor)?;
            println!(
                "Unlocked entry '{}'. It is editable again.",
                unlocked.title
            );
        }

        EntryCommands::Link {
            entry,
            reagent,
            quantity,
            unit,
            notes,
        } => {
            let actor = require_actor(actor)?;
            service.link_reagent(entry, reagent, quantity, &unit, &notes, actor)?;
            println!("Linked reagent {} to entry {}", reagent, entry);
        }

        EntryCommands::Unlink { entry, reagent } => {
            let actor = require_actor(actor)?;
            service.unlink_reagent(entry, reagent, actor)?;
            println!("Unlinked reagent {} from entry {}", reagent, entry);
        }
    }

    Ok(())
}
