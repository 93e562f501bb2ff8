//! Workspace repository for database operations

use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::domain::workspace::{Catalogue, CreateWorkspaceParams, Platform, Workspace};
use crate::error::{Error, Result};
use crate::infra::sqlite::{conflict_on_unique, parse_timestamp};

/// Database row for workspace
#[derive(Debug, FromRow)]
struct WorkspaceRow {
    id: String,
    name: String,
    path: String,
    schema_index: i64,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, FromRow)]
struct CatalogueRow {
    name: String,
    url: String,
    publish: bool,
}

#[derive(Debug, FromRow)]
struct PlatformRow {
    name: String,
    url: String,
    publish: bool,
    token_path: Option<String>,
}

impl TryFrom<WorkspaceRow> for Workspace {
    type Error = Error;

    fn try_from(row: WorkspaceRow) -> Result<Self> {
        Ok(Workspace {
            id: row.id,
            name: row.name,
            path: PathBuf::from(row.path),
            schema_index: row.schema_index as usize,
            catalogues: Vec::new(),
            platforms: Vec::new(),
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
        })
    }
}

/// Workspace repository for database operations.
///
/// Catalogues and platforms are stored in their own tables and always
/// read and written together with the workspace, in configuration order.
pub struct WorkspaceRepository {
    pool: SqlitePool,
}

impl WorkspaceRepository {
    /// Create a new repository with the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new workspace rooted at `<base_dir>/<id>`
    pub async fn create(&self, params: &CreateWorkspaceParams, base_dir: &Path) -> Result<Workspace> {
        let id = Uuid::new_v4().to_string();
        let path = base_dir.join(&id);
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO workspaces (id, name, path, schema_index, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&params.name)
        .bind(path.to_string_lossy().as_ref())
        .bind(params.schema_index.unwrap_or(0) as i64)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || format!("workspace '{}'", params.name)))?;

        self.get(&id).await
    }

    /// Get a workspace by ID
    pub async fn get(&self, id: &str) -> Result<Workspace> {
        let row: WorkspaceRow = sqlx::query_as(
            r#"
            SELECT id, name, path, schema_index, created_at, updated_at
            FROM workspaces
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::WorkspaceNotFound(id.to_string()))?;

        let mut workspace: Workspace = row.try_into()?;
        self.load_servers(&mut workspace).await?;
        Ok(workspace)
    }

    /// List all workspaces
    pub async fn list(&self) -> Result<Vec<Workspace>> {
        let rows: Vec<WorkspaceRow> = sqlx::query_as(
            r#"
            SELECT id, name, path, schema_index, created_at, updated_at
            FROM workspaces
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut workspaces = Vec::with_capacity(rows.len());
        for row in rows {
            let mut workspace: Workspace = row.try_into()?;
            self.load_servers(&mut workspace).await?;
            workspaces.push(workspace);
        }
        Ok(workspaces)
    }

    /// Persist name, schema index, catalogues and platforms.
    ///
    /// The stored catalogue and platform lists are replaced.
    pub async fn update(&self, workspace: &Workspace) -> Result<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE workspaces
            SET name = ?, schema_index = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&workspace.name)
        .bind(workspace.schema_index as i64)
        .bind(now.to_rfc3339())
        .bind(&workspace.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, || format!("workspace '{}'", workspace.name)))?;

        if result.rows_affected() == 0 {
            return Err(Error::WorkspaceNotFound(workspace.id.clone()));
        }

        replace_catalogues(&mut tx, &workspace.id, &workspace.catalogues).await?;
        replace_platforms(&mut tx, &workspace.id, &workspace.platforms).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a workspace with everything it owns
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::WorkspaceNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn load_servers(&self, workspace: &mut Workspace) -> Result<()> {
        let catalogues: Vec<CatalogueRow> = sqlx::query_as(
            r#"
            SELECT name, url, publish
            FROM catalogues
            WHERE workspace_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(&workspace.id)
        .fetch_all(&self.pool)
        .await?;

        let platforms: Vec<PlatformRow> = sqlx::query_as(
            r#"
            SELECT name, url, publish, token_path
            FROM platforms
            WHERE workspace_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(&workspace.id)
        .fetch_all(&self.pool)
        .await?;

        workspace.catalogues = catalogues
            .into_iter()
            .map(|r| Catalogue {
                name: r.name,
                url: r.url,
                publish: r.publish,
            })
            .collect();
        workspace.platforms = platforms
            .into_iter()
            .map(|r| Platform {
                name: r.name,
                url: r.url,
                publish: r.publish,
                token_path: r.token_path,
            })
            .collect();
        Ok(())
    }
}

async fn replace_catalogues(
    tx: &mut Transaction<'_, Sqlite>,
    workspace_id: &str,
    catalogues: &[Catalogue],
) -> Result<()> {
    sqlx::query("DELETE FROM catalogues WHERE workspace_id = ?")
        .bind(workspace_id)
        .execute(&mut **tx)
        .await?;

    for (position, catalogue) in catalogues.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO catalogues (workspace_id, position, name, url, publish)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(workspace_id)
        .bind(position as i64)
        .bind(&catalogue.name)
        .bind(&catalogue.url)
        .bind(catalogue.publish)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn replace_platforms(
    tx: &mut Transaction<'_, Sqlite>,
    workspace_id: &str,
    platforms: &[Platform],
) -> Result<()> {
    sqlx::query("DELETE FROM platforms WHERE workspace_id = ?")
        .bind(workspace_id)
        .execute(&mut **tx)
        .await?;

    for (position, platform) in platforms.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO platforms (workspace_id, position, name, url, publish, token_path)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(workspace_id)
        .bind(position as i64)
        .bind(&platform.name)
        .bind(&platform.url)
        .bind(platform.publish)
        .bind(&platform.token_path)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
