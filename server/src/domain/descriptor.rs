//! Descriptor domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Kind of descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// Virtual network function
    Vnf,
    /// Network service
    Ns,
}

impl DescriptorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::Vnf => "vnf",
            DescriptorKind::Ns => "ns",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "vnf" => Some(DescriptorKind::Vnf),
            "ns" => Some(DescriptorKind::Ns),
            _ => None,
        }
    }

    /// Folder under a project's `sources/` holding this kind
    pub fn source_folder(&self) -> SourceFolder {
        match self {
            DescriptorKind::Vnf => SourceFolder::Vnf,
            DescriptorKind::Ns => SourceFolder::Nsd,
        }
    }
}

/// Folder category under a project's `sources/` directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFolder {
    Vnf,
    Nsd,
}

impl SourceFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFolder::Vnf => "vnf",
            SourceFolder::Nsd => "nsd",
        }
    }
}

/// VNF or network service descriptor.
///
/// `descriptor` holds the JSON-encoded document; `name`, `vendor` and
/// `version` are projections of its top-level fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Descriptor {
    /// Unique identifier
    pub id: String,

    /// Owning project
    pub project_id: String,

    pub kind: DescriptorKind,

    /// JSON-encoded descriptor document
    pub descriptor: String,

    pub name: String,
    pub vendor: String,
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Descriptor {
    /// Create a descriptor from a parsed document
    pub fn from_document(
        id: String,
        project_id: String,
        kind: DescriptorKind,
        document: &Value,
    ) -> Result<Self> {
        let now = Utc::now();
        let mut descriptor = Self {
            id,
            project_id,
            kind,
            descriptor: String::new(),
            name: String::new(),
            vendor: String::new(),
            version: String::new(),
            created_at: now,
            updated_at: now,
        };
        descriptor.set_document(document)?;
        Ok(descriptor)
    }

    /// Replace the document and its projected fields in place.
    ///
    /// The model is left untouched when a required field is missing.
    pub fn set_document(&mut self, document: &Value) -> Result<()> {
        let name = required_field(document, "name")?;
        let vendor = required_field(document, "vendor")?;
        let version = required_field(document, "version")?;

        self.descriptor = serde_json::to_string(document)?;
        self.name = name;
        self.vendor = vendor;
        self.version = version;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Parse the stored document
    pub fn document(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.descriptor)?)
    }

    /// The `(vendor, name, version)` triple identifying this descriptor
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.vendor, &self.name, &self.version)
    }
}

/// Read a top-level scalar of a document as a string
pub fn required_field(document: &Value, key: &str) -> Result<String> {
    match document.get(key) {
        None | Some(Value::Null) => Err(Error::MissingField(key.to_string())),
        Some(value) => scalar_to_string(value).ok_or_else(|| {
            Error::InvalidDescriptor(format!("field '{}' must be a scalar", key))
        }),
    }
}

/// Render a scalar value the way it reads in YAML
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
