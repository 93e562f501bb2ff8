//! Workspace service

use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tracing::{error, info, warn};

use crate::config::schema_url;
use crate::domain::workspace::{CreateWorkspaceParams, Platform, UpdateWorkspaceParams, Workspace};
use crate::error::{Error, Result};
use crate::infra::workspace_descriptor::{
    init_workspace_descriptor, load_workspace_descriptor, update_workspace_descriptor,
};
use crate::infra::workspace_repository::WorkspaceRepository;
use crate::Config;

/// Workspace service keeping workspace records and `workspace.yml` in step
pub struct WorkspaceService {
    repository: Arc<WorkspaceRepository>,
    config: Arc<Config>,
}

impl WorkspaceService {
    /// Create a new workspace service
    pub fn new(repository: Arc<WorkspaceRepository>, config: Arc<Config>) -> Self {
        Self { repository, config }
    }

    /// Create a new workspace with its directory and `workspace.yml`
    pub async fn create(&self, params: CreateWorkspaceParams) -> Result<Workspace> {
        info!("Creating workspace with name: {:?}", params.name);

        validate_name(&params.name)?;
        schema_url(&self.config.schemas, params.schema_index.unwrap_or(0))?;

        // Create database record first
        let workspace = self
            .repository
            .create(&params, Path::new(&self.config.workspace_dir))
            .await?;

        if let Err(e) = init_workspace_descriptor(&workspace, &self.config.schemas).await {
            error!("Failed to initialize workspace {}: {}", workspace.id, e);
            // Clean up database record
            let _ = self.repository.delete(&workspace.id).await;
            return Err(e);
        }

        Ok(workspace)
    }

    /// Get a workspace by ID
    pub async fn get(&self, id: &str) -> Result<Workspace> {
        self.repository.get(id).await
    }

    /// List all workspaces
    pub async fn list(&self) -> Result<Vec<Workspace>> {
        self.repository.list().await
    }

    /// Update a workspace, then rewrite its `workspace.yml`
    pub async fn update(&self, id: &str, params: UpdateWorkspaceParams) -> Result<Workspace> {
        let mut workspace = self.repository.get(id).await?;

        if let Some(name) = params.name {
            validate_name(&name)?;
            workspace.name = name;
        }
        if let Some(index) = params.schema_index {
            schema_url(&self.config.schemas, index)?;
            workspace.schema_index = index;
        }
        if let Some(catalogues) = params.catalogues {
            workspace.catalogues = catalogues;
        }
        if let Some(platforms) = params.platforms {
            validate_platforms(&platforms)?;
            workspace.platforms = platforms;
        }

        self.repository.update(&workspace).await?;
        update_workspace_descriptor(&workspace, &self.config.schemas).await?;

        info!("Workspace {} updated", id);
        self.repository.get(id).await
    }

    /// Replace the stored catalogues, platforms and schema index with the
    /// contents of `workspace.yml`
    pub async fn reload(&self, id: &str) -> Result<Workspace> {
        let mut workspace = self.repository.get(id).await?;
        workspace.catalogues.clear();
        workspace.platforms.clear();

        load_workspace_descriptor(&mut workspace).await?;
        schema_url(&self.config.schemas, workspace.schema_index)?;

        self.repository.update(&workspace).await?;

        info!(
            "Workspace {} reloaded: {} catalogue(s), {} platform(s)",
            id,
            workspace.catalogues.len(),
            workspace.platforms.len()
        );
        self.repository.get(id).await
    }

    /// Delete a workspace and its directory
    pub async fn delete(&self, id: &str) -> Result<()> {
        let workspace = self.repository.get(id).await?;

        // Remove workspace directory
        if fs::try_exists(&workspace.path).await.unwrap_or(false) {
            if let Err(e) = fs::remove_dir_all(&workspace.path).await {
                warn!("Failed to remove workspace directory: {}", e);
            }
        }

        // Delete from database
        self.repository.delete(id).await?;

        info!("Workspace {} deleted", id);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidRequest("name must not be empty".to_string()));
    }
    Ok(())
}

/// At most one platform may be the publish target
fn validate_platforms(platforms: &[Platform]) -> Result<()> {
    let marked = platforms.iter().filter(|p| p.publish).count();
    if marked > 1 {
        return Err(Error::InvalidRequest(format!(
            "{} platforms marked for publishing, at most one allowed",
            marked
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaRemote;
    use crate::domain::workspace::Catalogue;
    use crate::infra::paths::{workspace_descriptor_path, PROJECTS_DIR};
    use crate::infra::sqlite::create_test_pool;
    use tempfile::{tempdir, TempDir};

    async fn service() -> (WorkspaceService, TempDir) {
        let dir = tempdir().unwrap();
        let config = Config {
            workspace_dir: dir.path().to_string_lossy().into_owned(),
            schemas: vec![
                SchemaRemote {
                    url: "https://schemas.example/a/".into(),
                    name: None,
                },
                SchemaRemote {
                    url: "https://schemas.example/b/".into(),
                    name: None,
                },
            ],
            ..Config::default()
        };
        let repo = Arc::new(WorkspaceRepository::new(create_test_pool().await));
        (WorkspaceService::new(repo, Arc::new(config)), dir)
    }

    fn create_params(name: &str) -> CreateWorkspaceParams {
        CreateWorkspaceParams {
            name: name.into(),
            schema_index: None,
        }
    }

    fn platform(name: &str, publish: bool) -> Platform {
        Platform {
            name: name.into(),
            url: format!("http://{name}"),
            publish,
            token_path: None,
        }
    }

    async fn read_descriptor(workspace: &Workspace) -> serde_yaml::Value {
        let contents = fs::read_to_string(workspace_descriptor_path(workspace))
            .await
            .unwrap();
        serde_yaml::from_str(&contents).unwrap()
    }

    #[tokio::test]
    async fn test_create_writes_layout() {
        let (service, _dir) = service().await;

        let workspace = service.create(create_params("ws")).await.unwrap();

        assert!(workspace.path.join(PROJECTS_DIR).is_dir());
        let descriptor = read_descriptor(&workspace).await;
        assert_eq!(descriptor["name"], "ws");
        assert_eq!(descriptor["schemas_remote_master"], "https://schemas.example/a/");
        assert_eq!(descriptor["default_service_platform"], "");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let (service, _dir) = service().await;

        let result = service
            .create(CreateWorkspaceParams {
                name: "ws".into(),
                schema_index: Some(7),
            })
            .await;
        assert!(matches!(result, Err(Error::SchemaIndexOutOfRange { index: 7, .. })));
        assert!(service.list().await.unwrap().is_empty());

        let result = service.create(create_params("  ")).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));

        service.create(create_params("ws")).await.unwrap();
        let result = service.create(create_params("ws")).await;
        assert!(matches!(result, Err(Error::NameConflict(_))));
    }

    #[tokio::test]
    async fn test_update_then_reload_round_trip() {
        let (service, _dir) = service().await;
        let workspace = service.create(create_params("ws")).await.unwrap();

        let updated = service
            .update(
                &workspace.id,
                UpdateWorkspaceParams {
                    schema_index: Some(1),
                    catalogues: Some(vec![Catalogue {
                        name: "cat1".into(),
                        url: "http://cat1".into(),
                        publish: true,
                    }]),
                    platforms: Some(vec![platform("sp1", false), platform("sp2", true)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.schema_index, 1);

        let descriptor = read_descriptor(&updated).await;
        assert_eq!(descriptor["default_service_platform"], "sp2");
        assert_eq!(descriptor["schemas_remote_master"], "https://schemas.example/b/");

        // Reload twice: the file is the single source, nothing accumulates
        service.reload(&workspace.id).await.unwrap();
        let reloaded = service.reload(&workspace.id).await.unwrap();
        assert_eq!(reloaded.catalogues, updated.catalogues);
        assert_eq!(reloaded.platforms, updated.platforms);
        assert_eq!(reloaded.schema_index, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_two_publish_platforms() {
        let (service, _dir) = service().await;
        let workspace = service.create(create_params("ws")).await.unwrap();

        let result = service
            .update(
                &workspace.id,
                UpdateWorkspaceParams {
                    platforms: Some(vec![platform("a", true), platform("b", true)]),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_update_out_of_range_leaves_file() {
        let (service, _dir) = service().await;
        let workspace = service.create(create_params("ws")).await.unwrap();
        let path = workspace_descriptor_path(&workspace);
        let before = fs::read_to_string(&path).await.unwrap();

        let result = service
            .update(
                &workspace.id,
                UpdateWorkspaceParams {
                    schema_index: Some(2),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(Error::SchemaIndexOutOfRange { .. })));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_directory() {
        let (service, _dir) = service().await;
        let workspace = service.create(create_params("ws")).await.unwrap();

        service.delete(&workspace.id).await.unwrap();

        assert!(!workspace.path.exists());
        let result = service.get(&workspace.id).await;
        assert!(matches!(result, Err(Error::WorkspaceNotFound(_))));
    }
}
