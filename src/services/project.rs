//! Project and experiment service
//!
//! Projects group experiments. Deleting a project cascades to its
//! experiments, and the cascade is visible in the audit trail: one Delete
//! event per removed experiment plus one for the project itself, so nothing
//! disappears from the record without its own event.

use serde_json::json;

use crate::audit::{describe_changes, AuditAction, AuditDraft, AuditSink, EntityKind};
use crate::error::{LabbookError, LabbookResult};
use crate::models::{Experiment, ExperimentId, Project, ProjectId};
use crate::storage::Storage;

/// Service for projects and experiments
pub struct ProjectService<'a> {
    storage: &'a Storage,
    audit: &'a dyn AuditSink,
}

impl<'a> ProjectService<'a> {
    /// Create a new project service
    pub fn new(storage: &'a Storage, audit: &'a dyn AuditSink) -> Self {
        Self { storage, audit }
    }

    /// Create a new project
    pub fn create_project(
        &self,
        name: &str,
        description: &str,
        actor: &str,
    ) -> LabbookResult<Project> {
        let name = name.trim();
        let actor = require_actor(actor)?;
        if name.is_empty() {
            return Err(LabbookError::Validation(
                "Project name cannot be empty".into(),
            ));
        }

        let project = Project::new(name, description.trim());

        self.storage.projects.upsert_project(project.clone())?;
        if let Err(err) = self.persist_and_record(AuditDraft::new(
            EntityKind::Project,
            project.id.to_string(),
            AuditAction::Create,
            actor,
            format!("Project '{}' created", project.name),
        )) {
            report_rollback(
                self.storage
                    .projects
                    .remove_project(project.id)
                    .and_then(|_| self.storage.projects.save()),
            );
            return Err(err);
        }

        Ok(project)
    }

    /// Update a project's name and/or description
    pub fn update_project(
        &self,
        id: ProjectId,
        name: Option<String>,
        description: Option<String>,
        actor: &str,
    ) -> LabbookResult<Project> {
        let actor = require_actor(actor)?;

        let before = self
            .storage
            .projects
            .get_project(id)?
            .ok_or_else(|| LabbookError::project_not_found(id.to_string()))?;

        let mut project = before.clone();
        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(LabbookError::Validation(
                    "Project name cannot be empty".into(),
                ));
            }
            project.name = name;
        }
        if let Some(description) = description {
            project.description = description.trim().to_string();
        }
        project.updated_at = chrono::Utc::now();

        let changes = describe_changes(
            &json!({ "name": before.name, "description": before.description }),
            &json!({ "name": project.name, "description": project.description }),
        )
        .unwrap_or_else(|| "no field changes".to_string());

        self.storage.projects.upsert_project(project.clone())?;
        if let Err(err) = self.persist_and_record(AuditDraft::new(
            EntityKind::Project,
            id.to_string(),
            AuditAction::Update,
            actor,
            changes,
        )) {
            report_rollback(
                self.storage
                    .projects
                    .upsert_project(before)
                    .and_then(|_| self.storage.projects.save()),
            );
            return Err(err);
        }

        Ok(project)
    }

    /// Delete a project and all of its experiments
    ///
    /// The cascade proceeds one entity at a time, experiments first, each as
    /// its own durable remove-plus-event step. A storage fault mid-cascade
    /// stops it with the already-removed experiments committed and audited;
    /// retrying the delete finishes the rest.
    pub fn delete_project(&self, id: ProjectId, actor: &str) -> LabbookResult<()> {
        let actor = require_actor(actor)?;

        let project = self
            .storage
            .projects
            .get_project(id)?
            .ok_or_else(|| LabbookError::project_not_found(id.to_string()))?;

        for experiment in self.storage.projects.get_experiments_for(id)? {
            self.remove_experiment_step(&experiment, actor)?;
        }

        self.storage.projects.remove_project(id)?;
        if let Err(err) = self.persist_and_record(AuditDraft::new(
            EntityKind::Project,
            id.to_string(),
            AuditAction::Delete,
            actor,
            format!("Project '{}' deleted", project.name),
        )) {
            report_rollback(
                self.storage
                    .projects
                    .upsert_project(project)
                    .and_then(|_| self.storage.projects.save()),
            );
            return Err(err);
        }

        Ok(())
    }

    /// Create an experiment under an existing project
    pub fn create_experiment(
        &self,
        project_id: ProjectId,
        title: &str,
        description: &str,
        actor: &str,
    ) -> LabbookResult<Experiment> {
        let title = title.trim();
        let actor = require_actor(actor)?;
        if title.is_empty() {
            return Err(LabbookError::Validation(
                "Experiment title cannot be empty".into(),
            ));
        }
        if self.storage.projects.get_project(project_id)?.is_none() {
            return Err(LabbookError::project_not_found(project_id.to_string()));
        }

        let experiment = Experiment::new(project_id, title, description.trim());

        self.storage
            .projects
            .upsert_experiment(experiment.clone())?;
        if let Err(err) = self.persist_and_record(AuditDraft::new(
            EntityKind::Experiment,
            experiment.id.to_string(),
            AuditAction::Create,
            actor,
            format!(
                "Experiment '{}' created in project {}",
                experiment.title, project_id
            ),
        )) {
            report_rollback(
                self.storage
                    .projects
                    .remove_experiment(experiment.id)
                    .and_then(|_| self.storage.projects.save()),
            );
            return Err(err);
        }

        Ok(experiment)
    }

    /// Delete a single experiment
    pub fn delete_experiment(&self, id: ExperimentId, actor: &str) -> LabbookResult<()> {
        let actor = require_actor(actor)?;

        let experiment = self
            .storage
            .projects
            .get_experiment(id)?
            .ok_or_else(|| LabbookError::experiment_not_found(id.to_string()))?;

        self.remove_experiment_step(&experiment, actor)
    }

    /// Get a project by id
    pub fn get_project(&self, id: ProjectId) -> LabbookResult<Project> {
        self.storage
            .projects
            .get_project(id)?
            .ok_or_else(|| LabbookError::project_not_found(id.to_string()))
    }

    /// List all projects, sorted by name
    pub fn list_projects(&self) -> LabbookResult<Vec<Project>> {
        self.storage.projects.get_projects()
    }

    /// List the experiments of a project, oldest first
    pub fn list_experiments(&self, project_id: ProjectId) -> LabbookResult<Vec<Experiment>> {
        if self.storage.projects.get_project(project_id)?.is_none() {
            return Err(LabbookError::project_not_found(project_id.to_string()));
        }
        self.storage.projects.get_experiments_for(project_id)
    }

    /// Remove one experiment as a durable step with its own Delete event
    fn remove_experiment_step(
        &self,
        experiment: &Experiment,
        actor: &str,
    ) -> LabbookResult<()> {
        self.storage.projects.remove_experiment(experiment.id)?;
        if let Err(err) = self.persist_and_record(AuditDraft::new(
            EntityKind::Experiment,
            experiment.id.to_string(),
            AuditAction::Delete,
            actor,
            format!("Experiment '{}' deleted", experiment.title),
        )) {
            report_rollback(
                self.storage
                    .projects
                    .upsert_experiment(experiment.clone())
                    .and_then(|_| self.storage.projects.save()),
            );
            return Err(err);
        }
        Ok(())
    }

    /// Save the projects file, then record the event; errors bubble to the
    /// caller which restores the pre-mutation state
    fn persist_and_record(&self, draft: AuditDraft) -> LabbookResult<()> {
        self.storage.projects.save()?;
        self.audit.record(draft)?;
        Ok(())
    }
}

/// Log a failed rollback without displacing the error that triggered it
fn report_rollback(result: LabbookResult<()>) {
    if let Err(err) = result {
        eprintln!("warning: could not unwind staged project change: {}", err);
    }
}

fn require_actor(actor: &str) -> LabbookResult<&str> {
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(LabbookError::Validation(
            "Actor identity cannot be empty".into(),
        ));
    }
    Ok(actor)
}
