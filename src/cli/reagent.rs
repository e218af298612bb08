//! Reagent CLI commands

use clap::Subcommand;

use crate::audit::AuditSink;
use crate::display::reagent::format_reagent_list;
use crate::error::LabbookResult;
use crate::models::ReagentId;
use crate::services::ReagentService;
use crate::storage::Storage;

use super::require_actor;

/// Reagent subcommands
#[derive(Subcommand)]
pub enum ReagentCommands {
    /// Register a new reagent
    Add {
        /// Reagent name
        name: String,
        /// Supplier catalog number
        #[arg(short, long, default_value = "")]
        catalog: String,
        /// Supplier name
        #[arg(short, long, default_value = "")]
        supplier: String,
    },
    /// List all reagents
    List,
    /// Edit a reagent's registry fields
    Edit {
        /// Reagent ID
        reagent: ReagentId,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New catalog number
        #[arg(short, long)]
        catalog: Option<String>,
        /// New supplier
        #[arg(short, long)]
        supplier: Option<String>,
    },
    /// Delete a reagent (refused while any entry links it)
    Delete {
        /// Reagent ID
        reagent: ReagentId,
    },
}

/// Handle a reagent command
pub fn handle_reagent_command(
    storage: &Storage,
    audit: &dyn AuditSink,
    actor: Option<&str>,
    cmd: ReagentCommands,
) -> LabbookResult<()> {
    let service = ReagentService::new(storage, audit);

    match cmd {
        ReagentCommands::Add {
            name,
            catalog,
            supplier,
        } => {
            let actor = require_actor(actor)?;
            let reagent = service.create(&name, &catalog, &supplier, actor)?;
            println!("Registered reagent: {}", reagent.name);
            println!("  ID: {}", reagent.id);
        }

        ReagentCommands::List => {
            let reagents = service.list()?;
            print!("{}", format_reagent_list(&reagents));
        }

        ReagentCommands::Edit {
            reagent,
            name,
            catalog,
            supplier,
        } => {
            let actor = require_actor(actor)?;
            if name.is_none() && catalog.is_none() && supplier.is_none() {
                println!("No changes specified. Use --name, --catalog, or --supplier.");
                return Ok(());
            }
            let updated = service.update(reagent, name, catalog, supplier, actor)?;
            println!("Updated reagent: {}", updated.name);
        }

        ReagentCommands::Delete { reagent } => {
            let actor = require_actor(actor)?;
            service.delete(reagent, actor)?;
            println!("Deleted reagent {}", reagent);
        }
    }

    Ok(())
}
