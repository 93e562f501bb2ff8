//! Project domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::Field;

/// Publish target used when neither the database nor `project.yml` names one
pub const DEFAULT_PUBLISH_TO: &str = "personal";

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: String,

    /// Owning workspace
    pub workspace_id: String,

    /// Name, unique within the workspace
    pub name: String,

    /// Location under the workspace's `projects/` directory
    pub rel_path: String,

    pub description: Field,
    pub maintainer: Field,
    pub vendor: Field,
    pub version: Field,

    /// Comma-joined publish targets
    pub publish_to: Field,

    pub repo_url: Field,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project stored under a directory named after it
    pub fn new(id: String, workspace_id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            workspace_id,
            rel_path: name.clone(),
            name,
            description: Field::Unset,
            maintainer: Field::Unset,
            vendor: Field::Unset,
            version: Field::Unset,
            publish_to: Field::Unset,
            repo_url: Field::Unset,
            created_at: now,
            updated_at: now,
        }
    }

    /// Publish targets as a list
    pub fn publish_targets(&self) -> Vec<String> {
        match self.publish_to.as_str() {
            Some(joined) => joined.split(',').map(str::to_string).collect(),
            None => Vec::new(),
        }
    }
}

/// Parameters for creating a project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProjectParams {
    pub name: String,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub publish_to: Option<Vec<String>>,
    pub repo_url: Option<String>,
}

/// Parameters for updating a project; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub publish_to: Option<Vec<String>>,
    pub repo_url: Option<String>,
}

impl UpdateProjectParams {
    /// Apply the metadata fields to a project
    pub fn apply(&self, project: &mut Project) {
        if let Some(v) = &self.description {
            project.description = Field::from(v.as_str());
        }
        if let Some(v) = &self.maintainer {
            project.maintainer = Field::from(v.as_str());
        }
        if let Some(v) = &self.vendor {
            project.vendor = Field::from(v.as_str());
        }
        if let Some(v) = &self.version {
            project.version = Field::from(v.as_str());
        }
        if let Some(v) = &self.publish_to {
            project.publish_to = Field::from(v.join(","));
        }
        if let Some(v) = &self.repo_url {
            project.repo_url = Field::from(v.as_str());
        }
        project.updated_at = Utc::now();
    }
}

impl From<CreateProjectParams> for UpdateProjectParams {
    fn from(params: CreateProjectParams) -> Self {
        Self {
            name: None,
            description: params.description,
            maintainer: params.maintainer,
            vendor: params.vendor,
            version: params.version,
            publish_to: params.publish_to,
            repo_url: params.repo_url,
        }
    }
}
