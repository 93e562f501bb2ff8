//! Descriptor repository for database operations

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};

use crate::domain::descriptor::{Descriptor, DescriptorKind};
use crate::error::{Error, Result};
use crate::infra::sqlite::{conflict_on_unique, parse_timestamp};

/// Database row for descriptor
#[derive(Debug, FromRow)]
struct DescriptorRow {
    id: String,
    project_id: String,
    kind: String,
    descriptor: String,
    name: String,
    vendor: String,
    version: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<DescriptorRow> for Descriptor {
    type Error = Error;

    fn try_from(row: DescriptorRow) -> Result<Self> {
        let kind = DescriptorKind::from_str(&row.kind)
            .ok_or_else(|| Error::Internal(format!("Invalid descriptor kind: {}", row.kind)))?;

        Ok(Descriptor {
            id: row.id,
            project_id: row.project_id,
            kind,
            descriptor: row.descriptor,
            name: row.name,
            vendor: row.vendor,
            version: row.version,
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
        })
    }
}

fn conflict_message(descriptor: &Descriptor) -> String {
    format!(
        "{} {}/{}/{}",
        descriptor.kind.as_str(),
        descriptor.vendor,
        descriptor.name,
        descriptor.version
    )
}

/// Descriptor repository for database operations
pub struct DescriptorRepository {
    pool: SqlitePool,
}

impl DescriptorRepository {
    /// Create a new repository with the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a descriptor.
    ///
    /// A second descriptor with the same kind, vendor, name and version in
    /// one project is a name conflict.
    pub async fn create(&self, descriptor: &Descriptor) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO descriptors (id, project_id, kind, descriptor, name, vendor, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&descriptor.id)
        .bind(&descriptor.project_id)
        .bind(descriptor.kind.as_str())
        .bind(&descriptor.descriptor)
        .bind(&descriptor.name)
        .bind(&descriptor.vendor)
        .bind(&descriptor.version)
        .bind(descriptor.created_at.to_rfc3339())
        .bind(descriptor.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || conflict_message(descriptor)))?;

        Ok(())
    }

    /// Get a descriptor of a project by ID
    pub async fn get(&self, project_id: &str, kind: DescriptorKind, id: &str) -> Result<Descriptor> {
        let row: DescriptorRow = sqlx::query_as(
            r#"
            SELECT id, project_id, kind, descriptor, name, vendor, version, created_at, updated_at
            FROM descriptors
            WHERE project_id = ? AND kind = ? AND id = ?
            "#,
        )
        .bind(project_id)
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::DescriptorNotFound(id.to_string()))?;

        row.try_into()
    }

    /// List the descriptors of one kind in a project
    pub async fn list(&self, project_id: &str, kind: DescriptorKind) -> Result<Vec<Descriptor>> {
        let rows: Vec<DescriptorRow> = sqlx::query_as(
            r#"
            SELECT id, project_id, kind, descriptor, name, vendor, version, created_at, updated_at
            FROM descriptors
            WHERE project_id = ? AND kind = ?
            ORDER BY vendor, name, version
            "#,
        )
        .bind(project_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Write the document and identity columns of `descriptor`
    pub async fn update(&self, descriptor: &Descriptor) -> Result<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE descriptors
            SET descriptor = ?, name = ?, vendor = ?, version = ?, updated_at = ?
            WHERE project_id = ? AND kind = ? AND id = ?
            "#,
        )
        .bind(&descriptor.descriptor)
        .bind(&descriptor.name)
        .bind(&descriptor.vendor)
        .bind(&descriptor.version)
        .bind(now.to_rfc3339())
        .bind(&descriptor.project_id)
        .bind(descriptor.kind.as_str())
        .bind(&descriptor.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || conflict_message(descriptor)))?;

        if result.rows_affected() == 0 {
            return Err(Error::DescriptorNotFound(descriptor.id.clone()));
        }

        Ok(())
    }

    /// Delete a descriptor
    pub async fn delete(&self, project_id: &str, kind: DescriptorKind, id: &str) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM descriptors WHERE project_id = ? AND kind = ? AND id = ?")
                .bind(project_id)
                .bind(kind.as_str())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(Error::DescriptorNotFound(id.to_string()));
        }

        Ok(())
    }
}
