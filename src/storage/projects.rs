//! Project and experiment repository for JSON storage
//!
//! Both live in projects.json; experiments are indexed by their owning
//! project for cascade handling.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LabbookError;
use crate::models::{Experiment, ExperimentId, Project, ProjectId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable project data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ProjectData {
    projects: Vec<Project>,
    experiments: Vec<Experiment>,
}

/// Repository for projects and their experiments
pub struct ProjectRepository {
    path: PathBuf,
    projects: RwLock<HashMap<ProjectId, Project>>,
    experiments: RwLock<HashMap<ExperimentId, Experiment>>,
}

impl ProjectRepository {
    /// Create a new project repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            projects: RwLock::new(HashMap::new()),
            experiments: RwLock::new(HashMap::new()),
        }
    }

    /// Load projects and experiments from disk
    pub fn load(&self) -> Result<(), LabbookError> {
        let file_data: ProjectData = read_json(&self.path)?;

        let mut projects = self
            .projects
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut experiments = self
            .experiments
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        projects.clear();
        experiments.clear();
        for project in file_data.projects {
            projects.insert(project.id, project);
        }
        for experiment in file_data.experiments {
            experiments.insert(experiment.id, experiment);
        }

        Ok(())
    }

    /// Save projects and experiments to disk
    pub fn save(&self) -> Result<(), LabbookError> {
        let projects = self
            .projects
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let experiments = self
            .experiments
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut project_list: Vec<_> = projects.values().cloned().collect();
        project_list.sort_by(|a, b| a.name.cmp(&b.name));
        let mut experiment_list: Vec<_> = experiments.values().cloned().collect();
        experiment_list.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let file_data = ProjectData {
            projects: project_list,
            experiments: experiment_list,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a project by ID
    pub fn get_project(&self, id: ProjectId) -> Result<Option<Project>, LabbookError> {
        let projects = self
            .projects
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(projects.get(&id).cloned())
    }

    /// Get all projects, sorted by name
    pub fn get_projects(&self) -> Result<Vec<Project>, LabbookError> {
        let projects = self
            .projects
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = projects.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Insert or replace a project
    pub fn upsert_project(&self, project: Project) -> Result<(), LabbookError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        projects.insert(project.id, project);
        Ok(())
    }

    /// Remove a project record (cascade handling happens in the service)
    pub fn remove_project(&self, id: ProjectId) -> Result<(), LabbookError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        projects.remove(&id);
        Ok(())
    }

    /// Get an experiment by ID
    pub fn get_experiment(&self, id: ExperimentId) -> Result<Option<Experiment>, LabbookError> {
        let experiments = self
            .experiments
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(experiments.get(&id).cloned())
    }

    /// Get the experiments belonging to a project, oldest first
    pub fn get_experiments_for(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Experiment>, LabbookError> {
        let experiments = self
            .experiments
            .read()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = experiments
            .values()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(list)
    }

    /// Insert or replace an experiment
    pub fn upsert_experiment(&self, experiment: Experiment) -> Result<(), LabbookError> {
        let mut experiments = self
            .experiments
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        experiments.insert(experiment.id, experiment);
        Ok(())
    }

    /// Remove an experiment record
    pub fn remove_experiment(&self, id: ExperimentId) -> Result<(), LabbookError> {
        let mut experiments = self
            .experiments
            .write()
            .map_err(|e| LabbookError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        experiments.remove(&id);
        Ok(())
    }
}
