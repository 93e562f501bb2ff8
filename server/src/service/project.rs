//! Project service

use std::sync::Arc;

use tokio::fs;
use tracing::{error, info, warn};

use crate::domain::project::{CreateProjectParams, Project, UpdateProjectParams};
use crate::error::{Error, Result};
use crate::infra::paths::project_dir;
use crate::infra::project_descriptor::{init_project_descriptor, sync_project_descriptor};
use crate::infra::project_repository::ProjectRepository;
use crate::infra::workspace_repository::WorkspaceRepository;

/// Project service keeping project records and `project.yml` in step
pub struct ProjectService {
    projects: Arc<ProjectRepository>,
    workspaces: Arc<WorkspaceRepository>,
}

impl ProjectService {
    /// Create a new project service
    pub fn new(projects: Arc<ProjectRepository>, workspaces: Arc<WorkspaceRepository>) -> Self {
        Self {
            projects,
            workspaces,
        }
    }

    /// Create a project, lay out its directory and sync `project.yml`
    pub async fn create(&self, workspace_id: &str, params: CreateProjectParams) -> Result<Project> {
        info!("Creating project {:?} in workspace {}", params.name, workspace_id);

        let workspace = self.workspaces.get(workspace_id).await?;
        validate_name(&params.name)?;

        let mut project = self.projects.create(workspace_id, &params.name).await?;
        UpdateProjectParams::from(params).apply(&mut project);

        let synced = async {
            init_project_descriptor(&workspace, &project).await?;
            sync_project_descriptor(&mut project, &workspace).await?;
            self.projects.update(&project).await
        }
        .await;

        if let Err(e) = synced {
            error!("Failed to initialize project {}: {}", project.id, e);
            // Clean up database record
            let _ = self.projects.delete(workspace_id, &project.id).await;
            return Err(e);
        }

        Ok(project)
    }

    /// Get a project by ID
    pub async fn get(&self, workspace_id: &str, id: &str) -> Result<Project> {
        self.workspaces.get(workspace_id).await?;
        self.projects.get(workspace_id, id).await
    }

    /// List the projects of a workspace
    pub async fn list(&self, workspace_id: &str) -> Result<Vec<Project>> {
        self.workspaces.get(workspace_id).await?;
        self.projects.list(workspace_id).await
    }

    /// Update a project and sync `project.yml`.
    ///
    /// A rename moves the project directory.
    pub async fn update(
        &self,
        workspace_id: &str,
        id: &str,
        params: UpdateProjectParams,
    ) -> Result<Project> {
        let workspace = self.workspaces.get(workspace_id).await?;
        let mut project = self.projects.get(workspace_id, id).await?;
        let old_dir = project_dir(&workspace, &project);

        if let Some(name) = &params.name {
            validate_name(name)?;
            project.name = name.clone();
            project.rel_path = name.clone();
        }
        params.apply(&mut project);

        // Catches name conflicts before anything moves on disk
        self.projects.update(&project).await?;

        let new_dir = project_dir(&workspace, &project);
        if new_dir != old_dir {
            fs::rename(&old_dir, &new_dir).await?;
            info!(
                "Moved project {} from {} to {}",
                id,
                old_dir.display(),
                new_dir.display()
            );
        }

        sync_project_descriptor(&mut project, &workspace).await?;
        self.projects.update(&project).await?;

        Ok(project)
    }

    /// Pull `project.yml` into the record without changing anything else
    pub async fn sync(&self, workspace_id: &str, id: &str) -> Result<Project> {
        let workspace = self.workspaces.get(workspace_id).await?;
        let mut project = self.projects.get(workspace_id, id).await?;

        sync_project_descriptor(&mut project, &workspace).await?;
        self.projects.update(&project).await?;

        Ok(project)
    }

    /// Delete a project and its directory
    pub async fn delete(&self, workspace_id: &str, id: &str) -> Result<()> {
        let workspace = self.workspaces.get(workspace_id).await?;
        let project = self.projects.get(workspace_id, id).await?;

        let dir = project_dir(&workspace, &project);
        if fs::try_exists(&dir).await.unwrap_or(false) {
            if let Err(e) = fs::remove_dir_all(&dir).await {
                warn!("Failed to remove project directory: {}", e);
            }
        }

        self.projects.delete(workspace_id, id).await?;

        info!("Project {} deleted", id);
        Ok(())
    }
}

/// Project names double as directory names
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidRequest("name must not be empty".to_string()));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidRequest(format!(
            "'{}' is not a valid project name",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::Field;
    use crate::domain::project::DEFAULT_PUBLISH_TO;
    use crate::domain::workspace::{CreateWorkspaceParams, Workspace};
    use crate::infra::paths::project_descriptor_path;
    use crate::infra::sqlite::create_test_pool;
    use tempfile::{tempdir, TempDir};

    async fn setup() -> (ProjectService, Workspace, TempDir) {
        let dir = tempdir().unwrap();
        let pool = create_test_pool().await;
        let workspaces = Arc::new(WorkspaceRepository::new(pool.clone()));
        let workspace = workspaces
            .create(
                &CreateWorkspaceParams {
                    name: "ws".into(),
                    schema_index: None,
                },
                dir.path(),
            )
            .await
            .unwrap();
        let service = ProjectService::new(Arc::new(ProjectRepository::new(pool)), workspaces);
        (service, workspace, dir)
    }

    fn params(name: &str) -> CreateProjectParams {
        CreateProjectParams {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_syncs_descriptor() {
        let (service, ws, _dir) = setup().await;

        let project = service
            .create(
                &ws.id,
                CreateProjectParams {
                    description: Some("demo".into()),
                    ..params("proj1")
                },
            )
            .await
            .unwrap();

        assert_eq!(project.publish_to, Field::Set(DEFAULT_PUBLISH_TO.into()));
        let contents = fs::read_to_string(project_descriptor_path(&ws, &project))
            .await
            .unwrap();
        let descriptor: serde_yaml::Value = serde_yaml::from_str(&contents).unwrap();
        assert_eq!(descriptor["package"]["name"], "proj1");
        assert_eq!(descriptor["package"]["description"], "demo");

        let stored = service.get(&ws.id, &project.id).await.unwrap();
        assert_eq!(stored.publish_to, project.publish_to);
    }

    #[tokio::test]
    async fn test_sync_pulls_file_edits() {
        let (service, ws, _dir) = setup().await;
        let project = service.create(&ws.id, params("proj1")).await.unwrap();

        let path = project_descriptor_path(&ws, &project);
        fs::write(
            &path,
            "package:\n  name: proj1\n  maintainer: Jane\n  publish_to:\n  - catalogue\n",
        )
        .await
        .unwrap();

        let synced = service.sync(&ws.id, &project.id).await.unwrap();
        assert_eq!(synced.maintainer, Field::Set("Jane".into()));
        // Database value set at creation wins
        assert_eq!(synced.publish_to, Field::Set(DEFAULT_PUBLISH_TO.into()));
    }

    #[tokio::test]
    async fn test_rename_moves_directory() {
        let (service, ws, _dir) = setup().await;
        let project = service.create(&ws.id, params("proj1")).await.unwrap();
        let old_dir = project_dir(&ws, &project);

        let renamed = service
            .update(
                &ws.id,
                &project.id,
                UpdateProjectParams {
                    name: Some("proj2".into()),
                    vendor: Some("acme".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!old_dir.exists());
        assert!(project_descriptor_path(&ws, &renamed).is_file());
        assert_eq!(renamed.rel_path, "proj2");
        assert_eq!(renamed.vendor, Field::Set("acme".into()));
    }

    #[tokio::test]
    async fn test_rename_conflict_keeps_directory() {
        let (service, ws, _dir) = setup().await;
        let first = service.create(&ws.id, params("proj1")).await.unwrap();
        service.create(&ws.id, params("proj2")).await.unwrap();

        let result = service
            .update(
                &ws.id,
                &first.id,
                UpdateProjectParams {
                    name: Some("proj2".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(Error::NameConflict(_))));
        assert!(project_dir(&ws, &first).is_dir());
    }

    #[tokio::test]
    async fn test_invalid_names() {
        let (service, ws, _dir) = setup().await;

        for name in ["", "..", "a/b"] {
            let result = service.create(&ws.id, params(name)).await;
            assert!(matches!(result, Err(Error::InvalidRequest(_))), "{name}");
        }
        let result = service.create("missing", params("proj1")).await;
        assert!(matches!(result, Err(Error::WorkspaceNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_directory() {
        let (service, ws, _dir) = setup().await;
        let project = service.create(&ws.id, params("proj1")).await.unwrap();

        service.delete(&ws.id, &project.id).await.unwrap();

        assert!(!project_dir(&ws, &project).exists());
        assert!(service.list(&ws.id).await.unwrap().is_empty());
    }
}
