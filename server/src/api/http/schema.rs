//! Schema HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::descriptor::DescriptorKind;
use crate::{AppState, Error, Result};

/// A configured schema source
#[derive(Debug, Serialize)]
pub struct SchemaSourceResponse {
    pub index: usize,
    pub url: String,
    pub name: Option<String>,
}

/// List schema sources response
#[derive(Debug, Serialize)]
pub struct ListSchemasResponse {
    pub schemas: Vec<SchemaSourceResponse>,
}

/// List the configured schema sources
pub async fn list_schemas(State(state): State<AppState>) -> Json<ListSchemasResponse> {
    let schemas = state
        .schema_cache
        .sources()
        .iter()
        .enumerate()
        .map(|(index, source)| SchemaSourceResponse {
            index,
            url: source.url.clone(),
            name: source.name.clone(),
        })
        .collect();

    Json(ListSchemasResponse { schemas })
}

/// Get the schema a workspace validates `vnf` or `ns` descriptors against
pub async fn get_workspace_schema(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let kind = DescriptorKind::from_str(&kind).ok_or_else(|| {
        Error::InvalidRequest(format!("unknown schema kind '{}', expected vnf or ns", kind))
    })?;

    let workspace = state.workspace_service.get(&id).await?;
    let schema = state
        .schema_cache
        .get_schema(workspace.schema_index, kind)
        .await?;

    Ok(Json(schema))
}
