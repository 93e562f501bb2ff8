//! Publishing descriptors into a workspace's private catalogue

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::domain::descriptor::required_field;
use crate::error::Result;

/// File name of every descriptor in the private catalogue
pub const CATALOGUE_DESCRIPTOR: &str = "descriptor.yml";

/// `<workspace>/<vnf|ns>/<vendor>/<name>/<version>/descriptor.yml`
pub fn private_descriptor_path(
    workspace_path: &Path,
    is_vnf: bool,
    vendor: &str,
    name: &str,
    version: &str,
) -> PathBuf {
    let kind = if is_vnf { "vnf" } else { "ns" };
    workspace_path
        .join(kind)
        .join(vendor)
        .join(name)
        .join(version)
        .join(CATALOGUE_DESCRIPTOR)
}

/// Write `descriptor` to the private catalogue, creating directories as
/// needed and replacing any previous revision.
pub async fn write_private_descriptor(
    workspace_path: &Path,
    is_vnf: bool,
    descriptor: &Value,
) -> Result<PathBuf> {
    let vendor = required_field(descriptor, "vendor")?;
    let name = required_field(descriptor, "name")?;
    let version = required_field(descriptor, "version")?;

    let path = private_descriptor_path(workspace_path, is_vnf, &vendor, &name, &version);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let yaml = serde_yaml::to_string(descriptor)?;
    fs::write(&path, yaml).await?;

    info!("Published {}/{}/{} to {}", vendor, name, version, path.display());
    Ok(path)
}
