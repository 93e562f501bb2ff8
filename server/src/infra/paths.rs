//! Canonical on-disk locations of workspace, project and descriptor files

use std::path::PathBuf;

use crate::domain::descriptor::{Descriptor, SourceFolder};
use crate::domain::project::Project;
use crate::domain::workspace::Workspace;

pub const WORKSPACE_DESCRIPTOR: &str = "workspace.yml";
pub const PROJECT_DESCRIPTOR: &str = "project.yml";
pub const PROJECTS_DIR: &str = "projects";
pub const SOURCES_DIR: &str = "sources";

/// `<workspace>/workspace.yml`
pub fn workspace_descriptor_path(workspace: &Workspace) -> PathBuf {
    workspace.path.join(WORKSPACE_DESCRIPTOR)
}

/// `<workspace>/projects/<rel_path>`
pub fn project_dir(workspace: &Workspace, project: &Project) -> PathBuf {
    workspace.path.join(PROJECTS_DIR).join(&project.rel_path)
}

/// `<workspace>/projects/<rel_path>/project.yml`
pub fn project_descriptor_path(workspace: &Workspace, project: &Project) -> PathBuf {
    project_dir(workspace, project).join(PROJECT_DESCRIPTOR)
}

/// `<workspace>/projects/<rel_path>/sources/<folder>`
pub fn sources_dir(workspace: &Workspace, project: &Project, folder: SourceFolder) -> PathBuf {
    project_dir(workspace, project)
        .join(SOURCES_DIR)
        .join(folder.as_str())
}

/// Path of a descriptor file inside its project.
///
/// VNFs get one extra directory level named after the descriptor.
pub fn descriptor_path(
    workspace: &Workspace,
    project: &Project,
    folder: SourceFolder,
    descriptor: &Descriptor,
) -> PathBuf {
    let mut path = sources_dir(workspace, project, folder);
    if folder == SourceFolder::Vnf {
        path.push(&descriptor.name);
    }
    path.push(descriptor_file_name(descriptor));
    path
}

/// `<vendor>-<name>-<version>.yml`
pub fn descriptor_file_name(descriptor: &Descriptor) -> String {
    format!(
        "{}-{}-{}.yml",
        descriptor.vendor, descriptor.name, descriptor.version
    )
}
