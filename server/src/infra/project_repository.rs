//! Project repository for database operations

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::domain::field::Field;
use crate::domain::project::Project;
use crate::error::{Error, Result};
use crate::infra::sqlite::{conflict_on_unique, parse_timestamp};

/// Database row for project
#[derive(Debug, FromRow)]
struct ProjectRow {
    id: String,
    workspace_id: String,
    name: String,
    rel_path: String,
    description: Option<String>,
    maintainer: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
    publish_to: Option<String>,
    repo_url: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProjectRow> for Project {
    type Error = Error;

    fn try_from(row: ProjectRow) -> Result<Self> {
        Ok(Project {
            id: row.id,
            workspace_id: row.workspace_id,
            name: row.name,
            rel_path: row.rel_path,
            description: Field::from_db(row.description),
            maintainer: Field::from_db(row.maintainer),
            vendor: Field::from_db(row.vendor),
            version: Field::from_db(row.version),
            publish_to: Field::from_db(row.publish_to),
            repo_url: Field::from_db(row.repo_url),
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
        })
    }
}

const SELECT_PROJECT: &str = r#"
    SELECT id, workspace_id, name, rel_path, description, maintainer, vendor, version,
           publish_to, repo_url, created_at, updated_at
    FROM projects
"#;

/// Project repository for database operations
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    /// Create a new repository with the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new project with empty metadata
    pub async fn create(&self, workspace_id: &str, name: &str) -> Result<Project> {
        let project = Project::new(
            Uuid::new_v4().to_string(),
            workspace_id.to_string(),
            name.to_string(),
        );

        sqlx::query(
            r#"
            INSERT INTO projects (id, workspace_id, name, rel_path, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.workspace_id)
        .bind(&project.name)
        .bind(&project.rel_path)
        .bind(project.created_at.to_rfc3339())
        .bind(project.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || format!("project '{}'", name)))?;

        Ok(project)
    }

    /// Get a project of a workspace by ID
    pub async fn get(&self, workspace_id: &str, id: &str) -> Result<Project> {
        let row: ProjectRow = sqlx::query_as(&format!(
            "{SELECT_PROJECT} WHERE workspace_id = ? AND id = ?"
        ))
        .bind(workspace_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::ProjectNotFound(id.to_string()))?;

        row.try_into()
    }

    /// List the projects of a workspace
    pub async fn list(&self, workspace_id: &str) -> Result<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "{SELECT_PROJECT} WHERE workspace_id = ? ORDER BY name ASC"
        ))
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Write every column of `project`
    pub async fn update(&self, project: &Project) -> Result<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, rel_path = ?, description = ?, maintainer = ?, vendor = ?,
                version = ?, publish_to = ?, repo_url = ?, updated_at = ?
            WHERE workspace_id = ? AND id = ?
            "#,
        )
        .bind(&project.name)
        .bind(&project.rel_path)
        .bind(project.description.to_db())
        .bind(project.maintainer.to_db())
        .bind(project.vendor.to_db())
        .bind(project.version.to_db())
        .bind(project.publish_to.to_db())
        .bind(project.repo_url.to_db())
        .bind(now.to_rfc3339())
        .bind(&project.workspace_id)
        .bind(&project.id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, || format!("project '{}'", project.name)))?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(project.id.clone()));
        }

        Ok(())
    }

    /// Delete a project with its descriptors
    pub async fn delete(&self, workspace_id: &str, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE workspace_id = ? AND id = ?")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(id.to_string()));
        }

        Ok(())
    }
}
