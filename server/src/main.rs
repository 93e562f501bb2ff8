//! NFV Editor Server
//!
//! REST backend for editing VNF and network service descriptors. Workspace,
//! project and descriptor metadata lives in SQLite; descriptors themselves
//! are mirrored to YAML files under each workspace directory.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod error;
mod infra;
mod service;

pub use config::Config;
pub use error::{Error, Result};

use infra::descriptor_repository::DescriptorRepository;
use infra::project_repository::ProjectRepository;
use infra::schema_cache::{HttpSchemaFetcher, SchemaCache};
use infra::workspace_repository::WorkspaceRepository;
use service::descriptor::DescriptorService;
use service::project::ProjectService;
use service::workspace::WorkspaceService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub workspace_service: Arc<WorkspaceService>,
    pub project_service: Arc<ProjectService>,
    pub descriptor_service: Arc<DescriptorService>,
    pub schema_cache: Arc<SchemaCache>,
}

impl AppState {
    /// Wire repositories and services on top of a database pool
    pub fn new(config: Arc<Config>, pool: SqlitePool, schema_cache: Arc<SchemaCache>) -> Self {
        let workspace_repository = Arc::new(WorkspaceRepository::new(pool.clone()));
        let project_repository = Arc::new(ProjectRepository::new(pool.clone()));
        let descriptor_repository = Arc::new(DescriptorRepository::new(pool));

        let workspace_service = Arc::new(WorkspaceService::new(
            workspace_repository.clone(),
            config.clone(),
        ));

        let project_service = Arc::new(ProjectService::new(
            project_repository.clone(),
            workspace_repository.clone(),
        ));

        let descriptor_service = Arc::new(DescriptorService::new(
            descriptor_repository,
            project_repository,
            workspace_repository,
        ));

        Self {
            workspace_service,
            project_service,
            descriptor_service,
            schema_cache,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Arc::new(Config::load()?);
    let http_addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port).parse()?;

    info!("Starting Editor Server");
    info!("HTTP listening on {}", http_addr);
    info!("Workspaces stored under {}", config.workspace_dir);
    for (index, source) in config.schemas.iter().enumerate() {
        info!("Schema source {}: {}", index, source.url);
    }

    // Initialize infrastructure
    let pool = infra::sqlite::init(&config.database_url).await?;
    let fetcher = HttpSchemaFetcher::new(Duration::from_secs(config.schema_fetch_timeout))?;
    let schema_cache = Arc::new(SchemaCache::new(
        Arc::new(fetcher),
        config.schemas.clone(),
    ));

    let state = AppState::new(config, pool, schema_cache);
    let app = api::http::create_router(state);

    axum::serve(
        tokio::net::TcpListener::bind(http_addr).await?,
        app.into_make_service(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
