//! Synchronization between a workspace record and its `workspace.yml`

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tokio::fs;
use tracing::{debug, warn};

use crate::config::{schema_url, SchemaRemote};
use crate::domain::workspace::{Catalogue, Platform, Workspace};
use crate::error::{Error, Result};
use crate::infra::paths::{workspace_descriptor_path, PROJECTS_DIR};

const CATALOGUE_SERVERS: &str = "catalogue_servers";
const SERVICE_PLATFORMS: &str = "service_platforms";
const DEFAULT_SERVICE_PLATFORM: &str = "default_service_platform";
const SCHEMA_INDEX: &str = "schema_index";
const SCHEMAS_REMOTE_MASTER: &str = "schemas_remote_master";

/// Catalogue entry as stored in `catalogue_servers`
#[derive(Debug, Serialize, Deserialize)]
struct CatalogueServer {
    id: String,
    url: String,
    /// `"yes"` marks a publish target; anything else does not
    #[serde(default)]
    publish: Value,
}

/// Platform entry as stored under `service_platforms`
#[derive(Debug, Serialize, Deserialize)]
struct PlatformServer {
    url: String,
    #[serde(default)]
    credentials: Option<Credentials>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Credentials {
    #[serde(default)]
    token_file: Option<String>,
}

fn parse_mapping(contents: &str) -> Result<Mapping> {
    if contents.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(contents)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::InvalidDescriptor(
            "workspace descriptor must be a mapping".to_string(),
        )),
    }
}

/// Create the workspace directory layout and an initial `workspace.yml`
pub async fn init_workspace_descriptor(
    workspace: &Workspace,
    schemas: &[SchemaRemote],
) -> Result<()> {
    // Fail before touching the disk
    schema_url(schemas, workspace.schema_index)?;

    fs::create_dir_all(workspace.path.join(PROJECTS_DIR)).await?;
    let path = workspace_descriptor_path(workspace);
    if !fs::try_exists(&path).await? {
        fs::write(&path, "").await?;
    }
    update_workspace_descriptor(workspace, schemas).await
}

/// Overwrite the catalogue, platform, name and schema sections of
/// `workspace.yml` from the workspace record. Other keys are kept.
pub async fn update_workspace_descriptor(
    workspace: &Workspace,
    schemas: &[SchemaRemote],
) -> Result<()> {
    let path = workspace_descriptor_path(workspace);
    let contents = fs::read_to_string(&path).await?;
    let mut descriptor = parse_mapping(&contents)?;

    let remote_master = schema_url(schemas, workspace.schema_index)?;

    let mut catalogue_servers = Vec::with_capacity(workspace.catalogues.len());
    for cat in &workspace.catalogues {
        let server = CatalogueServer {
            id: cat.name.clone(),
            url: cat.url.clone(),
            publish: Value::from(if cat.publish { "yes" } else { "no" }),
        };
        catalogue_servers.push(serde_yaml::to_value(server)?);
    }

    let mut service_platforms = Mapping::new();
    for plat in &workspace.platforms {
        let server = PlatformServer {
            url: plat.url.clone(),
            credentials: Some(Credentials {
                token_file: plat.token_path.clone(),
            }),
        };
        service_platforms.insert(Value::from(plat.name.as_str()), serde_yaml::to_value(server)?);
    }

    let default_platform = workspace
        .default_platform()
        .map(|p| p.name.clone())
        .unwrap_or_default();

    descriptor.insert(CATALOGUE_SERVERS.into(), Value::Sequence(catalogue_servers));
    descriptor.insert(SERVICE_PLATFORMS.into(), Value::Mapping(service_platforms));
    descriptor.insert(DEFAULT_SERVICE_PLATFORM.into(), Value::from(default_platform));
    descriptor.insert("name".into(), Value::from(workspace.name.as_str()));
    descriptor.insert(SCHEMA_INDEX.into(), Value::from(workspace.schema_index as u64));
    descriptor.insert(SCHEMAS_REMOTE_MASTER.into(), Value::from(remote_master));

    fs::write(&path, serde_yaml::to_string(&Value::Mapping(descriptor))?).await?;

    debug!("Updated workspace descriptor {}", path.display());
    Ok(())
}

/// Append the catalogues and platforms found in `workspace.yml` to the
/// workspace record and copy its schema index.
///
/// Existing entries are not replaced, so loading twice duplicates them.
pub async fn load_workspace_descriptor(workspace: &mut Workspace) -> Result<()> {
    let path = workspace_descriptor_path(workspace);
    let contents = fs::read_to_string(&path).await?;
    let descriptor = parse_mapping(&contents)?;

    if let Some(value) = descriptor.get(CATALOGUE_SERVERS).filter(|v| !v.is_null()) {
        let servers: Vec<CatalogueServer> = serde_yaml::from_value(value.clone())?;
        for server in servers {
            if workspace.catalogues.iter().any(|c| c.name == server.id) {
                warn!(
                    "Workspace {} already has catalogue '{}', appending duplicate",
                    workspace.id, server.id
                );
            }
            workspace.catalogues.push(Catalogue {
                name: server.id,
                url: server.url,
                publish: server.publish.as_str() == Some("yes"),
            });
        }
    }

    if let Some(value) = descriptor.get(SERVICE_PLATFORMS).filter(|v| !v.is_null()) {
        let default_platform = descriptor
            .get(DEFAULT_SERVICE_PLATFORM)
            .and_then(Value::as_str);
        let platforms = value.as_mapping().ok_or_else(|| {
            Error::InvalidDescriptor(format!("{} must be a mapping", SERVICE_PLATFORMS))
        })?;

        for (key, value) in platforms {
            let name = key.as_str().ok_or_else(|| {
                Error::InvalidDescriptor(format!("{} keys must be strings", SERVICE_PLATFORMS))
            })?;
            let server: PlatformServer = serde_yaml::from_value(value.clone())?;
            if workspace.platforms.iter().any(|p| p.name == name) {
                warn!(
                    "Workspace {} already has platform '{}', appending duplicate",
                    workspace.id, name
                );
            }
            workspace.platforms.push(Platform {
                name: name.to_string(),
                url: server.url,
                publish: default_platform == Some(name),
                token_path: server.credentials.and_then(|c| c.token_file),
            });
        }
    }

    if let Some(value) = descriptor.get(SCHEMA_INDEX) {
        let index = value.as_u64().ok_or_else(|| {
            Error::InvalidDescriptor(format!("{} must be a non-negative integer", SCHEMA_INDEX))
        })?;
        workspace.schema_index = index as usize;
    }

    debug!("Loaded workspace descriptor {}", path.display());
    Ok(())
}
