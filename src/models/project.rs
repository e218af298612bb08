//! Project and experiment models
//!
//! Projects group experiments. Neither is versioned or lockable; they exist
//! so their lifecycle (including cascading deletes) lands in the audit trail
//! alongside protocols and entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ExperimentId, ProjectId};

/// A research project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Project name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last modified
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// An experiment within a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    /// Unique identifier
    pub id: ExperimentId,

    /// Owning project
    pub project_id: ProjectId,

    /// Experiment title
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// When the experiment was created
    pub created_at: DateTime<Utc>,

    /// When the experiment was last modified
    pub updated_at: DateTime<Utc>,
}

impl Experiment {
    /// Create a new experiment under a project
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExperimentId::new(),
            project_id,
            title: title.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
