//! Loading and saving VNF / NS descriptor files

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::domain::descriptor::{Descriptor, SourceFolder};
use crate::domain::project::Project;
use crate::domain::workspace::Workspace;
use crate::error::Result;
use crate::infra::paths::descriptor_path;

/// Load a descriptor file into `model`, replacing its document and its
/// name, vendor and version.
pub async fn load_ns_vnf_from_disk(file: &Path, model: &mut Descriptor) -> Result<()> {
    let contents = fs::read_to_string(file).await?;
    let document: Value = serde_yaml::from_str(&contents)?;
    model.set_document(&document)?;

    debug!("Loaded descriptor {:?} from {}", model.identity(), file.display());
    Ok(())
}

/// Write `model` to its canonical location as block-style YAML.
///
/// Only the immediate parent directory is created. An existing file is
/// overwritten.
pub async fn write_ns_vnf_to_disk(
    workspace: &Workspace,
    project: &Project,
    folder: SourceFolder,
    model: &Descriptor,
) -> Result<PathBuf> {
    let path = descriptor_path(workspace, project, folder, model);

    if let Some(parent) = path.parent() {
        if !fs::try_exists(parent).await? {
            fs::create_dir(parent).await?;
        }
    }

    let document: Value = serde_json::from_str(&model.descriptor)?;
    let yaml = serde_yaml::to_string(&document)?;
    fs::write(&path, yaml).await?;

    debug!("Wrote descriptor {:?} to {}", model.identity(), path.display());
    Ok(path)
}
