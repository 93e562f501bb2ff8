//! Integration test library - common utilities

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Test configuration
pub struct TestConfig {
    pub base_url: String,
    pub client: Client,
}

impl TestConfig {
    pub fn new() -> Self {
        let base_url = std::env::var("EDITOR_TEST_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());

        // Schema requests may hit a remote catalogue on first use
        let timeout_secs: u64 = std::env::var("EDITOR_TEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Workspace creation request
#[derive(Debug, Default, Serialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_index: Option<usize>,
}

/// Catalogue entry of a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    pub name: String,
    pub url: String,
    pub publish: bool,
}

/// Platform entry of a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub url: String,
    pub publish: bool,
    pub token_path: Option<String>,
}

/// Workspace response
#[derive(Debug, Deserialize)]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    pub path: String,
    pub schema_index: usize,
    pub catalogues: Vec<Catalogue>,
    pub platforms: Vec<Platform>,
    pub default_platform: Option<String>,
}

/// List workspaces response
#[derive(Debug, Deserialize)]
pub struct ListWorkspacesResponse {
    pub workspaces: Vec<WorkspaceResponse>,
    pub total: usize,
}

/// Project creation request
#[derive(Debug, Default, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_to: Option<Vec<String>>,
}

/// Project response
#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub rel_path: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub publish_to: Vec<String>,
}

/// Descriptor response
#[derive(Debug, Deserialize)]
pub struct DescriptorResponse {
    pub id: String,
    pub kind: String,
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub descriptor: Value,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub message: String,
}

/// Unique name so parallel runs against one server do not collide
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Create a workspace and return it
pub async fn create_workspace(config: &TestConfig, name: &str) -> WorkspaceResponse {
    config
        .client
        .post(config.api_url("/workspaces"))
        .json(&CreateWorkspaceRequest {
            name: name.to_string(),
            ..Default::default()
        })
        .send()
        .await
        .expect("Failed to create workspace")
        .json()
        .await
        .expect("Failed to parse workspace response")
}

/// Delete a workspace, ignoring failures
pub async fn cleanup_workspace(config: &TestConfig, id: &str) {
    let _ = config
        .client
        .delete(config.api_url(&format!("/workspaces/{}", id)))
        .send()
        .await;
}
