//! Function (VNF) and service (NS) descriptor handlers
//!
//! Both collections share one set of handlers, specialised by a
//! [`Collection`] marker type at routing time.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::descriptor::{Descriptor, DescriptorKind};
use crate::{AppState, Result};

/// A descriptor collection under a project
pub trait Collection {
    const KIND: DescriptorKind;
}

/// `/functions`, holding VNF descriptors
pub struct Functions;

/// `/services`, holding NS descriptors
pub struct Services;

impl Collection for Functions {
    const KIND: DescriptorKind = DescriptorKind::Vnf;
}

impl Collection for Services {
    const KIND: DescriptorKind = DescriptorKind::Ns;
}

/// Create or replace descriptor request
#[derive(Debug, Deserialize)]
pub struct DescriptorRequest {
    pub descriptor: Value,
}

/// Descriptor response
#[derive(Debug, Serialize)]
pub struct DescriptorResponse {
    pub id: String,
    pub project_id: String,
    pub kind: DescriptorKind,
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub descriptor: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<Descriptor> for DescriptorResponse {
    type Error = crate::Error;

    fn try_from(d: Descriptor) -> Result<Self> {
        let descriptor = d.document()?;
        Ok(Self {
            id: d.id,
            project_id: d.project_id,
            kind: d.kind,
            vendor: d.vendor,
            name: d.name,
            version: d.version,
            descriptor,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.to_rfc3339(),
        })
    }
}

/// List descriptors response
#[derive(Debug, Serialize)]
pub struct ListDescriptorsResponse {
    pub descriptors: Vec<DescriptorResponse>,
    pub total: usize,
}

/// Publish response
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub path: String,
}

/// Create a descriptor
pub async fn create_descriptor<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id)): Path<(String, String)>,
    Json(req): Json<DescriptorRequest>,
) -> Result<Json<DescriptorResponse>> {
    let descriptor = state
        .descriptor_service
        .create(&workspace_id, &project_id, C::KIND, &req.descriptor)
        .await?;
    Ok(Json(descriptor.try_into()?))
}

/// List the descriptors of a project
pub async fn list_descriptors<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id)): Path<(String, String)>,
) -> Result<Json<ListDescriptorsResponse>> {
    let descriptors = state
        .descriptor_service
        .list(&workspace_id, &project_id, C::KIND)
        .await?;
    let total = descriptors.len();

    Ok(Json(ListDescriptorsResponse {
        descriptors: descriptors
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_>>()?,
        total,
    }))
}

/// Get a descriptor by ID
pub async fn get_descriptor<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id, id)): Path<(String, String, String)>,
) -> Result<Json<DescriptorResponse>> {
    let descriptor = state
        .descriptor_service
        .get(&workspace_id, &project_id, C::KIND, &id)
        .await?;
    Ok(Json(descriptor.try_into()?))
}

/// Replace a descriptor's document
pub async fn update_descriptor<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id, id)): Path<(String, String, String)>,
    Json(req): Json<DescriptorRequest>,
) -> Result<Json<DescriptorResponse>> {
    let descriptor = state
        .descriptor_service
        .update(&workspace_id, &project_id, C::KIND, &id, &req.descriptor)
        .await?;
    Ok(Json(descriptor.try_into()?))
}

/// Delete a descriptor
pub async fn delete_descriptor<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id, id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>> {
    state
        .descriptor_service
        .delete(&workspace_id, &project_id, C::KIND, &id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Publish a descriptor to the workspace's private catalogue
pub async fn publish_descriptor<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id, id)): Path<(String, String, String)>,
) -> Result<Json<PublishResponse>> {
    let path = state
        .descriptor_service
        .publish(&workspace_id, &project_id, C::KIND, &id)
        .await?;
    Ok(Json(PublishResponse {
        path: path.to_string_lossy().into_owned(),
    }))
}

/// Re-read a descriptor from its file
pub async fn reload_descriptor<C: Collection>(
    State(state): State<AppState>,
    Path((workspace_id, project_id, id)): Path<(String, String, String)>,
) -> Result<Json<DescriptorResponse>> {
    let descriptor = state
        .descriptor_service
        .reload(&workspace_id, &project_id, C::KIND, &id)
        .await?;
    Ok(Json(descriptor.try_into()?))
}
