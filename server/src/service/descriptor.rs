//! Descriptor service for VNFs and network services

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::fs;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::descriptor::{Descriptor, DescriptorKind};
use crate::domain::project::Project;
use crate::domain::workspace::Workspace;
use crate::error::Result;
use crate::infra::descriptor_io::{load_ns_vnf_from_disk, write_ns_vnf_to_disk};
use crate::infra::descriptor_repository::DescriptorRepository;
use crate::infra::paths::descriptor_path;
use crate::infra::private_catalogue::write_private_descriptor;
use crate::infra::project_repository::ProjectRepository;
use crate::infra::workspace_repository::WorkspaceRepository;

/// Descriptor service keeping descriptor rows and their YAML files in step
pub struct DescriptorService {
    descriptors: Arc<DescriptorRepository>,
    projects: Arc<ProjectRepository>,
    workspaces: Arc<WorkspaceRepository>,
}

impl DescriptorService {
    /// Create a new descriptor service
    pub fn new(
        descriptors: Arc<DescriptorRepository>,
        projects: Arc<ProjectRepository>,
        workspaces: Arc<WorkspaceRepository>,
    ) -> Self {
        Self {
            descriptors,
            projects,
            workspaces,
        }
    }

    async fn scope(&self, workspace_id: &str, project_id: &str) -> Result<(Workspace, Project)> {
        let workspace = self.workspaces.get(workspace_id).await?;
        let project = self.projects.get(workspace_id, project_id).await?;
        Ok((workspace, project))
    }

    /// Store a new descriptor and write its file
    pub async fn create(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
        document: &Value,
    ) -> Result<Descriptor> {
        let (workspace, project) = self.scope(workspace_id, project_id).await?;
        let descriptor = Descriptor::from_document(
            Uuid::new_v4().to_string(),
            project.id.clone(),
            kind,
            document,
        )?;

        self.descriptors.create(&descriptor).await?;

        if let Err(e) =
            write_ns_vnf_to_disk(&workspace, &project, kind.source_folder(), &descriptor).await
        {
            error!("Failed to write descriptor {}: {}", descriptor.id, e);
            // Clean up database record
            let _ = self
                .descriptors
                .delete(&project.id, kind, &descriptor.id)
                .await;
            return Err(e);
        }

        info!(
            "Created {} {:?} in project {}",
            kind.as_str(),
            descriptor.identity(),
            project.name
        );
        Ok(descriptor)
    }

    /// Get a descriptor by ID
    pub async fn get(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
        id: &str,
    ) -> Result<Descriptor> {
        let (_, project) = self.scope(workspace_id, project_id).await?;
        self.descriptors.get(&project.id, kind, id).await
    }

    /// List the descriptors of one kind in a project
    pub async fn list(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
    ) -> Result<Vec<Descriptor>> {
        let (_, project) = self.scope(workspace_id, project_id).await?;
        self.descriptors.list(&project.id, kind).await
    }

    /// Replace the document of a descriptor.
    ///
    /// A changed vendor, name or version moves the file.
    pub async fn update(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
        id: &str,
        document: &Value,
    ) -> Result<Descriptor> {
        let (workspace, project) = self.scope(workspace_id, project_id).await?;
        let mut descriptor = self.descriptors.get(&project.id, kind, id).await?;
        let folder = kind.source_folder();
        let old_path = descriptor_path(&workspace, &project, folder, &descriptor);

        descriptor.set_document(document)?;
        self.descriptors.update(&descriptor).await?;
        let new_path = write_ns_vnf_to_disk(&workspace, &project, folder, &descriptor).await?;

        if new_path != old_path {
            remove_file(&old_path).await;
        }

        info!("Updated {} {}", kind.as_str(), id);
        Ok(descriptor)
    }

    /// Delete a descriptor and its file
    pub async fn delete(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
        id: &str,
    ) -> Result<()> {
        let (workspace, project) = self.scope(workspace_id, project_id).await?;
        let descriptor = self.descriptors.get(&project.id, kind, id).await?;

        self.descriptors.delete(&project.id, kind, id).await?;
        remove_file(&descriptor_path(
            &workspace,
            &project,
            kind.source_folder(),
            &descriptor,
        ))
        .await;

        info!("Deleted {} {}", kind.as_str(), id);
        Ok(())
    }

    /// Copy a descriptor into the workspace's private catalogue
    pub async fn publish(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
        id: &str,
    ) -> Result<PathBuf> {
        let (workspace, project) = self.scope(workspace_id, project_id).await?;
        let descriptor = self.descriptors.get(&project.id, kind, id).await?;

        write_private_descriptor(
            &workspace.path,
            kind == DescriptorKind::Vnf,
            &descriptor.document()?,
        )
        .await
    }

    /// Store what a descriptor's file currently contains.
    ///
    /// Picks up edits made to the YAML outside the editor. A file whose
    /// vendor, name or version changed is moved to its new location.
    pub async fn reload(
        &self,
        workspace_id: &str,
        project_id: &str,
        kind: DescriptorKind,
        id: &str,
    ) -> Result<Descriptor> {
        let (workspace, project) = self.scope(workspace_id, project_id).await?;
        let mut descriptor = self.descriptors.get(&project.id, kind, id).await?;
        let folder = kind.source_folder();
        let path = descriptor_path(&workspace, &project, folder, &descriptor);

        load_ns_vnf_from_disk(&path, &mut descriptor).await?;
        self.descriptors.update(&descriptor).await?;

        let new_path = write_ns_vnf_to_disk(&workspace, &project, folder, &descriptor).await?;
        if new_path != path {
            remove_file(&path).await;
        }

        info!("Reloaded {} {} from {}", kind.as_str(), id, path.display());
        Ok(descriptor)
    }
}

async fn remove_file(path: &std::path::Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
