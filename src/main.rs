use anyhow::Result;
use clap::{Parser, Subcommand};

use labbook::audit::FileAuditLog;
use labbook::cli::{
    handle_audit_command, handle_entry_command, handle_project_command, handle_protocol_command,
    handle_reagent_command, AuditArgs,
};
use labbook::config::{paths::LabbookPaths, settings::Settings};
use labbook::storage::Storage;

#[derive(Parser)]
#[command(
    name = "labbook",
    version,
    about = "Versioned, audited laboratory record keeping",
    long_about = "labbook is a terminal-based laboratory notebook. Protocols are \
                  versioned immutably, entries can be signed into a locked state, \
                  and every state change lands in an append-only audit trail."
)]
struct Cli {
    /// Actor identity recorded on mutations
    #[arg(long, global = true, env = "LABBOOK_ACTOR")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Protocol management commands (versioned)
    #[command(subcommand, alias = "pro")]
    Protocol(labbook::cli::ProtocolCommands),

    /// Entry management commands (lockable)
    #[command(subcommand, alias = "ent")]
    Entry(labbook::cli::EntryCommands),

    /// Reagent inventory commands
    #[command(subcommand, alias = "rgt")]
    Reagent(labbook::cli::ReagentCommands),

    /// Project and experiment commands
    #[command(subcommand, alias = "prj")]
    Project(labbook::cli::ProjectCommands),

    /// Show the audit trail
    Audit(AuditArgs),

    /// Initialize the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LabbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage and the audit log
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    let audit = FileAuditLog::open(paths.audit_log())?;

    let actor = settings.resolve_actor(cli.actor);
    let actor = actor.as_deref();

    match cli.command {
        Some(Commands::Protocol(cmd)) => {
            handle_protocol_command(&storage, &audit, actor, cmd)?;
        }
        Some(Commands::Entry(cmd)) => {
            handle_entry_command(&storage, &audit, actor, cmd)?;
        }
        Some(Commands::Reagent(cmd)) => {
            handle_reagent_command(&storage, &audit, actor, cmd)?;
        }
        Some(Commands::Project(cmd)) => {
            handle_project_command(&storage, &audit, actor, cmd)?;
        }
        Some(Commands::Audit(args)) => {
            handle_audit_command(&audit, args)?;
        }
        Some(Commands::Init) => {
            println!("Initializing labbook at: {}", paths.base_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete.");
            println!();
            println!("Set a default actor so mutations are attributed automatically:");
            println!(
                "  edit {} and add \"default_actor\": \"your name\"",
                paths.settings_file().display()
            );
        }
        Some(Commands::Config) => {
            println!("labbook configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Default actor: {}",
                settings.default_actor.as_deref().unwrap_or("(not set)")
            );
            println!("  Date format:   {}", settings.date_format);
            println!("  Audit events:  {}", audit.event_count()?);
        }
        None => {
            println!("labbook - versioned, audited laboratory records");
            println!();
            println!("Run 'labbook --help' for usage information.");
            println!("Run 'labbook init' to set up the data directory.");
        }
    }

    Ok(())
}
