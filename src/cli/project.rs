//! Project and experiment CLI commands

use clap::Subcommand;

use crate::audit::AuditSink;
use crate::display::project::{format_project_details, format_project_list};
use crate::error::LabbookResult;
use crate::models::{ExperimentId, ProjectId};
use crate::services::ProjectService;
use crate::storage::Storage;

use super::require_actor;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List all projects
    List,
    /// Show a project and its experiments
    Show {
        /// Project ID
        project: ProjectId,
    },
    /// Edit a project
    Edit {
        /// Project ID
        project: ProjectId,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a project and all of its experiments
    Delete {
        /// Project ID
        project: ProjectId,
    },
    /// Add an experiment to a project
    AddExperiment {
        /// Project ID
        project: ProjectId,
        /// Experiment title
        title: String,
        /// Experiment description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a single experiment
    DeleteExperiment {
        /// Experiment ID
        experiment: ExperimentId,
    },
}

/// Handle a project command
pub fn handle_project_command(
    storage: &Storage,
    audit: &dyn AuditSink,
    actor: Option<&str>,
    cmd: ProjectCommands,
) -> LabbookResult<()> {
    let service = ProjectService::new(storage, audit);

    match cmd {
        ProjectCommands::Create { name, description } => {
            let actor = require_actor(actor)?;
            let project = service.create_project(&name, &description, actor)?;
            println!("Created project: {}", project.name);
            println!("  ID: {}", project.id);
        }

        ProjectCommands::List => {
            let projects = service.list_projects()?;
            print!("{}", format_project_list(&projects));
        }

        ProjectCommands::Show { project } => {
            let found = service.get_project(project)?;
            let experiments = service.list_experiments(project)?;
            print!("{}", format_project_details(&found, &experiments));
        }

        ProjectCommands::Edit {
            project,
            name,
            description,
        } => {
            let actor = require_actor(actor)?;
            if name.is_none() && description.is_none() {
                println!("No changes specified. Use --name or --description.");
                return Ok(());
            }
            let updated = service.update_project(project, name, description, actor)?;
            println!("Updated project: {}", updated.name);
        }

        ProjectCommands::Delete { project } => {
            let actor = require_actor(actor)?;
            let experiments = service.list_experiments(project)?;
            service.delete_project(project, actor)?;
            println!(
                "Deleted project {} and {} experiment(s)",
                project,
                experiments.len()
            );
        }

        ProjectCommands::AddExperiment {
            project,
            title,
            description,
        } => {
            let actor = require_actor(actor)?;
            let experiment = service.create_experiment(project, &title, &description, actor)?;
            println!("Created experiment: {}", experiment.title);
            println!("  ID: {}", experiment.id);
        }

        ProjectCommands::DeleteExperiment { experiment } => {
            let actor = require_actor(actor)?;
            service.delete_experiment(experiment, actor)?;
            println!("Deleted experiment {}", experiment);
        }
    }

    Ok(())
}
