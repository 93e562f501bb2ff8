//! Workspace domain model

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workspace entity
///
/// A workspace is the top-level container rooted at a directory on disk. It
/// owns projects and the catalogue/platform configuration mirrored into its
/// `workspace.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier
    pub id: String,

    /// Human-readable name, unique across workspaces
    pub name: String,

    /// Filesystem root
    pub path: PathBuf,

    /// Index into the configured schema sources
    pub schema_index: usize,

    /// Catalogue servers, in configuration order
    pub catalogues: Vec<Catalogue>,

    /// Service platforms, in configuration order
    pub platforms: Vec<Platform>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Create a new workspace
    pub fn new(id: String, name: String, path: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            path,
            schema_index: 0,
            catalogues: Vec::new(),
            platforms: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The platform descriptors get published to.
    ///
    /// Falls back to the first platform when none is marked.
    pub fn default_platform(&self) -> Option<&Platform> {
        self.platforms
            .iter()
            .find(|p| p.publish)
            .or_else(|| self.platforms.first())
    }
}

/// Catalogue server a workspace can publish to or fetch from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub publish: bool,
}

/// Service platform a workspace can deploy to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub token_path: Option<String>,
}

/// Parameters for creating a workspace
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWorkspaceParams {
    pub name: String,

    /// Defaults to the first schema source
    pub schema_index: Option<usize>,
}

/// Parameters for updating a workspace.
///
/// Catalogue and platform lists replace the stored ones wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkspaceParams {
    pub name: Option<String>,
    pub schema_index: Option<usize>,
    pub catalogues: Option<Vec<Catalogue>>,
    pub platforms: Option<Vec<Platform>>,
}
