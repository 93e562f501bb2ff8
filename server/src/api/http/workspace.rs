//! Workspace HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::workspace::{
    Catalogue, CreateWorkspaceParams, Platform, UpdateWorkspaceParams, Workspace,
};
use crate::{AppState, Result};

// ==================== Request/Response Types ====================

/// Create workspace request
#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub schema_index: Option<usize>,
}

/// Update workspace request; omitted fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub schema_index: Option<usize>,
    pub catalogues: Option<Vec<Catalogue>>,
    pub platforms: Option<Vec<Platform>>,
}

/// Workspace response
#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    pub path: String,
    pub schema_index: usize,
    pub catalogues: Vec<Catalogue>,
    pub platforms: Vec<Platform>,
    pub default_platform: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(w: Workspace) -> Self {
        let default_platform = w.default_platform().map(|p| p.name.clone());
        Self {
            id: w.id,
            name: w.name,
            path: w.path.to_string_lossy().into_owned(),
            schema_index: w.schema_index,
            catalogues: w.catalogues,
            platforms: w.platforms,
            default_platform,
            created_at: w.created_at.to_rfc3339(),
            updated_at: w.updated_at.to_rfc3339(),
        }
    }
}

/// List workspaces response
#[derive(Debug, Serialize)]
pub struct ListWorkspacesResponse {
    pub workspaces: Vec<WorkspaceResponse>,
    pub total: usize,
}

// ==================== Handlers ====================

/// Create a new workspace
pub async fn create_workspace(
    State(state): State<AppState>,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<Json<WorkspaceResponse>> {
    let params = CreateWorkspaceParams {
        name: req.name,
        schema_index: req.schema_index,
    };

    let workspace = state.workspace_service.create(params).await?;
    Ok(Json(workspace.into()))
}

/// Get a workspace by ID
pub async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkspaceResponse>> {
    let workspace = state.workspace_service.get(&id).await?;
    Ok(Json(workspace.into()))
}

/// List all workspaces
pub async fn list_workspaces(
    State(state): State<AppState>,
) -> Result<Json<ListWorkspacesResponse>> {
    let workspaces = state.workspace_service.list().await?;
    let total = workspaces.len();

    Ok(Json(ListWorkspacesResponse {
        workspaces: workspaces.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Update a workspace and its `workspace.yml`
pub async fn update_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> Result<Json<WorkspaceResponse>> {
    let params = UpdateWorkspaceParams {
        name: req.name,
        schema_index: req.schema_index,
        catalogues: req.catalogues,
        platforms: req.platforms,
    };

    let workspace = state.workspace_service.update(&id, params).await?;
    Ok(Json(workspace.into()))
}

/// Re-read `workspace.yml` into the workspace record
pub async fn reload_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkspaceResponse>> {
    let workspace = state.workspace_service.reload(&id).await?;
    Ok(Json(workspace.into()))
}

/// Delete a workspace
pub async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.workspace_service.delete(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
