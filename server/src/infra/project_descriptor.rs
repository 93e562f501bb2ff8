//! Two-way synchronization between a project record and its `project.yml`

use serde_yaml::{Mapping, Value};
use tokio::fs;
use tracing::debug;

use crate::domain::descriptor::SourceFolder;
use crate::domain::field::Field;
use crate::domain::project::{Project, DEFAULT_PUBLISH_TO};
use crate::domain::workspace::Workspace;
use crate::error::{Error, Result};
use crate::infra::paths::{project_descriptor_path, project_dir, sources_dir};

const PACKAGE: &str = "package";
const PUBLISH_TO: &str = "publish_to";

/// Read `project.yml` as a mapping
pub async fn load_project_descriptor(workspace: &Workspace, project: &Project) -> Result<Mapping> {
    let contents = fs::read_to_string(project_descriptor_path(workspace, project)).await?;
    match serde_yaml::from_str::<Value>(&contents)? {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(Error::InvalidDescriptor(
            "project descriptor must be a mapping".to_string(),
        )),
    }
}

/// Replace `project.yml` with `descriptor`
pub async fn write_project_descriptor(
    workspace: &Workspace,
    project: &Project,
    descriptor: &Mapping,
) -> Result<()> {
    let yaml = serde_yaml::to_string(descriptor)?;
    fs::write(project_descriptor_path(workspace, project), yaml).await?;
    Ok(())
}

/// Create the project directory skeleton and a minimal `project.yml`.
///
/// An existing `project.yml` is left as is.
pub async fn init_project_descriptor(workspace: &Workspace, project: &Project) -> Result<()> {
    fs::create_dir_all(sources_dir(workspace, project, SourceFolder::Vnf)).await?;
    fs::create_dir_all(sources_dir(workspace, project, SourceFolder::Nsd)).await?;

    let path = project_descriptor_path(workspace, project);
    if fs::try_exists(&path).await? {
        return Ok(());
    }

    let mut package = Mapping::new();
    package.insert("name".into(), Value::from(project.name.as_str()));
    let mut descriptor = Mapping::new();
    descriptor.insert(PACKAGE.into(), Value::Mapping(package));
    write_project_descriptor(workspace, project, &descriptor).await?;

    debug!(
        "Initialized project {} in {}",
        project.name,
        project_dir(workspace, project).display()
    );
    Ok(())
}

/// Reconcile the project record with the `package` section of `project.yml`.
///
/// The name always flows to the file. For the other fields a database value
/// that is not `Unset` overwrites the file, otherwise a file value is copied
/// into the record. The file is rewritten on every call.
pub async fn sync_project_descriptor(project: &mut Project, workspace: &Workspace) -> Result<()> {
    let mut descriptor = load_project_descriptor(workspace, project).await?;
    let package = descriptor
        .get_mut(PACKAGE)
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| Error::MissingField(PACKAGE.to_string()))?;

    package.insert("name".into(), Value::from(project.name.as_str()));
    sync_field(package, "description", &mut project.description)?;
    sync_field(package, "maintainer", &mut project.maintainer)?;
    sync_field(package, "vendor", &mut project.vendor)?;
    sync_field(package, "version", &mut project.version)?;
    sync_publish_to(package, &mut project.publish_to)?;
    sync_field(package, "repo_url", &mut project.repo_url)?;

    write_project_descriptor(workspace, project, &descriptor).await?;

    debug!("Synced project descriptor for {}", project.name);
    Ok(())
}

fn sync_field(package: &mut Mapping, key: &str, field: &mut Field) -> Result<()> {
    if let Some(value) = field.as_str() {
        package.insert(key.into(), Value::from(value));
        return Ok(());
    }
    if let Some(value) = package.get(key) {
        *field = Field::from_db(scalar(key, value)?);
    }
    Ok(())
}

fn sync_publish_to(package: &mut Mapping, field: &mut Field) -> Result<()> {
    match field {
        Field::Set(joined) => {
            let targets = joined.split(',').map(Value::from).collect();
            package.insert(PUBLISH_TO.into(), Value::Sequence(targets));
            return Ok(());
        }
        Field::Empty => {
            package.insert(PUBLISH_TO.into(), Value::Sequence(Vec::new()));
            return Ok(());
        }
        Field::Unset => {}
    }

    *field = match package.get(PUBLISH_TO) {
        Some(Value::Sequence(items)) => {
            let mut targets = Vec::with_capacity(items.len());
            for item in items {
                if let Some(target) = scalar(PUBLISH_TO, item)? {
                    targets.push(target);
                }
            }
            Field::from(targets.join(","))
        }
        Some(value) => match scalar(PUBLISH_TO, value)? {
            Some(target) => Field::from(target),
            None => Field::Set(DEFAULT_PUBLISH_TO.to_string()),
        },
        None => Field::Set(DEFAULT_PUBLISH_TO.to_string()),
    };
    Ok(())
}

/// Read a scalar file value as a string; null reads as absent
fn scalar(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(Error::InvalidDescriptor(format!(
            "package.{} must be a scalar",
            key
        ))),
    }
}
