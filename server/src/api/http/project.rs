//! Project HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::domain::project::{CreateProjectParams, Project, UpdateProjectParams};
use crate::{AppState, Result};

/// Project response
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub rel_path: String,
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub publish_to: Vec<String>,
    pub repo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        let publish_to = p.publish_targets();
        Self {
            id: p.id,
            workspace_id: p.workspace_id,
            name: p.name,
            rel_path: p.rel_path,
            description: p.description.to_db(),
            maintainer: p.maintainer.to_db(),
            vendor: p.vendor.to_db(),
            version: p.version.to_db(),
            publish_to,
            repo_url: p.repo_url.to_db(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// List projects response
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectResponse>,
    pub total: usize,
}

/// Create a project in a workspace
pub async fn create_project(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
    Json(req): Json<CreateProjectParams>,
) -> Result<Json<ProjectResponse>> {
    let project = state.project_service.create(&workspace_id, req).await?;
    Ok(Json(project.into()))
}

/// List the projects of a workspace
pub async fn list_projects(
    State(state): State<AppState>,
    Path(workspace_id): Path<String>,
) -> Result<Json<ListProjectsResponse>> {
    let projects = state.project_service.list(&workspace_id).await?;
    let total = projects.len();

    Ok(Json(ListProjectsResponse {
        projects: projects.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get a project by ID
pub async fn get_project(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(String, String)>,
) -> Result<Json<ProjectResponse>> {
    let project = state.project_service.get(&workspace_id, &id).await?;
    Ok(Json(project.into()))
}

/// Update a project
pub async fn update_project(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(String, String)>,
    Json(req): Json<UpdateProjectParams>,
) -> Result<Json<ProjectResponse>> {
    let project = state.project_service.update(&workspace_id, &id, req).await?;
    Ok(Json(project.into()))
}

/// Reconcile a project with its `project.yml`
pub async fn sync_project(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(String, String)>,
) -> Result<Json<ProjectResponse>> {
    let project = state.project_service.sync(&workspace_id, &id).await?;
    Ok(Json(project.into()))
}

/// Delete a project
pub async fn delete_project(
    State(state): State<AppState>,
    Path((workspace_id, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>> {
    state.project_service.delete(&workspace_id, &id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
