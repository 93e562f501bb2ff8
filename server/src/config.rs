//! Server configuration

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming an optional YAML config file
const CONFIG_FILE_ENV: &str = "EDITOR_CONFIG";

/// Prefix for environment overrides (e.g. `EDITOR_HTTP_PORT`)
const ENV_PREFIX: &str = "EDITOR";

/// A remote schema catalogue, indexed by a workspace's `schema_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRemote {
    /// Base URL holding `function-descriptor/` and `service-descriptor/`
    pub url: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server host
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Database URL (SQLite)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Base directory holding one folder per workspace
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,

    /// Timeout for a single schema download in seconds
    #[serde(default = "default_schema_fetch_timeout")]
    pub schema_fetch_timeout: u64,

    /// Remote schema sources, in index order
    #[serde(default = "default_schemas")]
    pub schemas: Vec<SchemaRemote>,
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    "sqlite:data/editor.db?mode=rwc".to_string()
}

fn default_workspace_dir() -> String {
    "/var/lib/editor/workspaces".to_string()
}

fn default_schema_fetch_timeout() -> u64 {
    30
}

fn default_schemas() -> Vec<SchemaRemote> {
    vec![SchemaRemote {
        url: "https://raw.githubusercontent.com/sonata-nfv/son-schema/master/".to_string(),
        name: Some("SONATA".to_string()),
    }]
}

impl Config {
    /// Load configuration from an optional YAML file and `EDITOR_*` environment variables
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| "config.yaml".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::new(&path, config::FileFormat::Yaml).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("load configuration from {path}"))?;

        let config: Config = settings
            .try_deserialize()
            .context("deserialize configuration")?;

        if config.schemas.is_empty() {
            anyhow::bail!("at least one schema source must be configured");
        }

        Ok(config)
    }
}

/// Resolve the remote master URL for a schema index
pub fn schema_url(schemas: &[SchemaRemote], schema_index: usize) -> Result<&str> {
    schemas
        .get(schema_index)
        .map(|s| s.url.as_str())
        .ok_or(Error::SchemaIndexOutOfRange {
            index: schema_index,
            configured: schemas.len(),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            database_url: default_database_url(),
            workspace_dir: default_workspace_dir(),
            schema_fetch_timeout: default_schema_fetch_timeout(),
            schemas: default_schemas(),
        }
    }
}
