//! HTTP API handlers

mod descriptor;
mod health;
mod project;
mod schema;
mod workspace;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use descriptor::{Functions, Services};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Schema sources
        .route("/schemas", get(schema::list_schemas))
        // Workspace routes
        .route(
            "/workspaces",
            post(workspace::create_workspace).get(workspace::list_workspaces),
        )
        .route(
            "/workspaces/{ws}",
            get(workspace::get_workspace)
                .put(workspace::update_workspace)
                .delete(workspace::delete_workspace),
        )
        .route("/workspaces/{ws}/reload", post(workspace::reload_workspace))
        .route(
            "/workspaces/{ws}/schemas/{kind}",
            get(schema::get_workspace_schema),
        )
        // Project routes
        .route(
            "/workspaces/{ws}/projects",
            post(project::create_project).get(project::list_projects),
        )
        .route(
            "/workspaces/{ws}/projects/{project}",
            get(project::get_project)
                .put(project::update_project)
                .delete(project::delete_project),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/sync",
            post(project::sync_project),
        )
        // Function (VNF) routes
        .route(
            "/workspaces/{ws}/projects/{project}/functions",
            post(descriptor::create_descriptor::<Functions>)
                .get(descriptor::list_descriptors::<Functions>),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/functions/{id}",
            get(descriptor::get_descriptor::<Functions>)
                .put(descriptor::update_descriptor::<Functions>)
                .delete(descriptor::delete_descriptor::<Functions>),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/functions/{id}/publish",
            post(descriptor::publish_descriptor::<Functions>),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/functions/{id}/reload",
            post(descriptor::reload_descriptor::<Functions>),
        )
        // Service (NS) routes
        .route(
            "/workspaces/{ws}/projects/{project}/services",
            post(descriptor::create_descriptor::<Services>)
                .get(descriptor::list_descriptors::<Services>),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/services/{id}",
            get(descriptor::get_descriptor::<Services>)
                .put(descriptor::update_descriptor::<Services>)
                .delete(descriptor::delete_descriptor::<Services>),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/services/{id}/publish",
            post(descriptor::publish_descriptor::<Services>),
        )
        .route(
            "/workspaces/{ws}/projects/{project}/services/{id}/reload",
            post(descriptor::reload_descriptor::<Services>),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
