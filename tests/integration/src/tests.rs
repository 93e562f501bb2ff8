//! Integration tests for the Editor Server
//!
//! These tests require a running server.
//! Run with: EDITOR_TEST_URL=http://127.0.0.1:5000 cargo test -- --ignored

use integration_tests::*;
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_health_check() {
    let config = TestConfig::new();

    let response = config
        .client
        .get(config.api_url("/health"))
        .send()
        .await
        .expect("Failed to send health request");

    assert!(
        response.status().is_success(),
        "Health check failed with status: {}",
        response.status()
    );

    let health: HealthResponse = response.json().await.expect("Failed to parse health response");
    assert_eq!(health.status, "healthy");
    assert!(!health.version.is_empty());
}

// ============================================================================
// Workspace Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_create_and_list_workspaces() {
    let config = TestConfig::new();
    let name = unique_name("ws");

    let workspace = create_workspace(&config, &name).await;
    assert_eq!(workspace.name, name);
    assert_eq!(workspace.schema_index, 0);
    assert!(workspace.catalogues.is_empty());
    assert!(workspace.default_platform.is_none());

    let list: ListWorkspacesResponse = config
        .client
        .get(config.api_url("/workspaces"))
        .send()
        .await
        .expect("Failed to list workspaces")
        .json()
        .await
        .unwrap();
    assert!(list.total >= 1);
    assert!(list.workspaces.iter().any(|w| w.id == workspace.id));

    // Cleanup
    cleanup_workspace(&config, &workspace.id).await;
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_duplicate_workspace_name() {
    let config = TestConfig::new();
    let name = unique_name("ws-dup");

    let workspace = create_workspace(&config, &name).await;

    let response = config
        .client
        .post(config.api_url("/workspaces"))
        .json(&CreateWorkspaceRequest {
            name: name.clone(),
            ..Default::default()
        })
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let error: ErrorResponse = response.json().await.unwrap();
    assert_eq!(error.code, 1001);

    // Cleanup
    cleanup_workspace(&config, &workspace.id).await;
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_update_and_reload_workspace() {
    let config = TestConfig::new();
    let workspace = create_workspace(&config, &unique_name("ws-update")).await;

    let platforms = vec![
        Platform {
            name: "sp1".into(),
            url: "http://sp1.example".into(),
            publish: false,
            token_path: None,
        },
        Platform {
            name: "sp2".into(),
            url: "http://sp2.example".into(),
            publish: false,
            token_path: Some("token.txt".into()),
        },
    ];

    let updated: WorkspaceResponse = config
        .client
        .put(config.api_url(&format!("/workspaces/{}", workspace.id)))
        .json(&json!({
            "catalogues": [{"name": "cat1", "url": "http://cat1.example", "publish": true}],
            "platforms": platforms,
        }))
        .send()
        .await
        .expect("Failed to update workspace")
        .json()
        .await
        .unwrap();
    assert_eq!(updated.platforms, platforms);
    // No platform marked: the first one is the default
    assert_eq!(updated.default_platform.as_deref(), Some("sp1"));

    let reloaded: WorkspaceResponse = config
        .client
        .post(config.api_url(&format!("/workspaces/{}/reload", workspace.id)))
        .send()
        .await
        .expect("Failed to reload workspace")
        .json()
        .await
        .unwrap();
    assert_eq!(reloaded.catalogues, updated.catalogues);
    assert_eq!(reloaded.platforms.len(), 2);
    assert!(reloaded.platforms[0].publish);

    // Cleanup
    cleanup_workspace(&config, &workspace.id).await;
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_get_missing_workspace() {
    let config = TestConfig::new();

    let response = config
        .client
        .get(config.api_url("/workspaces/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Project Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_project_lifecycle() {
    let config = TestConfig::new();
    let workspace = create_workspace(&config, &unique_name("ws-project")).await;
    let projects_url = config.api_url(&format!("/workspaces/{}/projects", workspace.id));

    let project: ProjectResponse = config
        .client
        .post(&projects_url)
        .json(&CreateProjectRequest {
            name: "proj1".into(),
            description: Some("demo project".into()),
            ..Default::default()
        })
        .send()
        .await
        .expect("Failed to create project")
        .json()
        .await
        .unwrap();
    assert_eq!(project.workspace_id, workspace.id);
    assert_eq!(project.rel_path, "proj1");
    assert_eq!(project.publish_to, vec!["personal"]);

    let renamed: ProjectResponse = config
        .client
        .put(format!("{}/{}", projects_url, project.id))
        .json(&json!({"name": "proj2", "vendor": "acme"}))
        .send()
        .await
        .expect("Failed to update project")
        .json()
        .await
        .unwrap();
    assert_eq!(renamed.rel_path, "proj2");
    assert_eq!(renamed.vendor.as_deref(), Some("acme"));
    assert_eq!(renamed.description.as_deref(), Some("demo project"));

    let response = config
        .client
        .delete(format!("{}/{}", projects_url, project.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // Cleanup
    cleanup_workspace(&config, &workspace.id).await;
}

// ============================================================================
// Descriptor Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_function_lifecycle() {
    let config = TestConfig::new();
    let workspace = create_workspace(&config, &unique_name("ws-vnf")).await;

    let project: ProjectResponse = config
        .client
        .post(config.api_url(&format!("/workspaces/{}/projects", workspace.id)))
        .json(&CreateProjectRequest {
            name: "proj1".into(),
            ..Default::default()
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let functions_url = config.api_url(&format!(
        "/workspaces/{}/projects/{}/functions",
        workspace.id, project.id
    ));

    let document = json!({
        "descriptor_version": "vnfd-schema-01",
        "vendor": "eu.example",
        "name": "firewall",
        "version": "0.1"
    });
    let vnf: DescriptorResponse = config
        .client
        .post(&functions_url)
        .json(&json!({ "descriptor": document }))
        .send()
        .await
        .expect("Failed to create function")
        .json()
        .await
        .unwrap();
    assert_eq!(vnf.kind, "vnf");
    assert_eq!(vnf.descriptor, document);

    // Same vendor, name and version again
    let response = config
        .client
        .post(&functions_url)
        .json(&json!({ "descriptor": document }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let updated: DescriptorResponse = config
        .client
        .put(format!("{}/{}", functions_url, vnf.id))
        .json(&json!({ "descriptor": {
            "vendor": "eu.example",
            "name": "firewall",
            "version": "0.2"
        }}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.version, "0.2");

    let response = config
        .client
        .post(format!("{}/{}/publish", functions_url, vnf.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // Cleanup
    cleanup_workspace(&config, &workspace.id).await;
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_service_missing_field() {
    let config = TestConfig::new();
    let workspace = create_workspace(&config, &unique_name("ws-ns")).await;

    let project: ProjectResponse = config
        .client
        .post(config.api_url(&format!("/workspaces/{}/projects", workspace.id)))
        .json(&CreateProjectRequest {
            name: "proj1".into(),
            ..Default::default()
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = config
        .client
        .post(config.api_url(&format!(
            "/workspaces/{}/projects/{}/services",
            workspace.id, project.id
        )))
        .json(&json!({ "descriptor": {"name": "svc", "version": "1.0"} }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = response.json().await.unwrap();
    assert_eq!(error.code, 4003);
    assert!(error.message.contains("vendor"));

    // Cleanup
    cleanup_workspace(&config, &workspace.id).await;
}
