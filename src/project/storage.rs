/// SQLite persistence layer for projects
///
/// Handles project CRUD in the application database. The flow document is
/// stored as an opaque JSON column; indexed metadata fields support
/// listing without deserializing every document.

use crate::project::types::{
    CreatePreRegistration, CreateProject, PreRegistration, Project, ProjectStatus, UpdateProject,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

/// SQLite-based project storage
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    /// SQLite connection pool
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the project schema
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                flow_json JSON,
                prompt TEXT,
                status TEXT NOT NULL DEFAULT 'draft',
                deployed_webhook_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_projects_updated_at
            ON projects(updated_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pre_registrations (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                name TEXT,
                company TEXT,
                use_case TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create a new project with a fresh id
    pub async fn create_project(&self, data: CreateProject) -> Result<Project> {
        let now = Utc::now().to_rfc3339();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            flow_json: None,
            prompt: data.prompt,
            status: ProjectStatus::Draft,
            deployed_webhook_url: None,
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO projects
                (id, name, description, flow_json, prompt, status,
                 deployed_webhook_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(flow_column(&project)?)
        .bind(&project.prompt)
        .bind(project.status.as_str())
        .bind(&project.deployed_webhook_url)
        .bind(&project.created_at)
        .bind(&project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(project)
    }

    /// Retrieve a project by id
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(project_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// List all projects, most recently updated first
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(project_from_row).collect()
    }

    /// Apply a partial update, bumping the updated_at timestamp
    ///
    /// Returns the stored project after the update, or None when the id
    /// is unknown.
    pub async fn update_project(&self, id: &str, update: UpdateProject) -> Result<Option<Project>> {
        let Some(mut project) = self.get_project(id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = Some(description);
        }
        if let Some(flow_json) = update.flow_json {
            project.flow_json = Some(flow_json);
        }
        if let Some(prompt) = update.prompt {
            project.prompt = Some(prompt);
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        if let Some(url) = update.deployed_webhook_url {
            project.deployed_webhook_url = Some(url);
        }
        project.updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE projects SET
                name = ?, description = ?, flow_json = ?, prompt = ?,
                status = ?, deployed_webhook_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(flow_column(&project)?)
        .bind(&project.prompt)
        .bind(project.status.as_str())
        .bind(&project.deployed_webhook_url)
        .bind(&project.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(project))
    }

    /// Record an early-access pre-registration
    pub async fn create_pre_registration(
        &self,
        data: CreatePreRegistration,
    ) -> Result<PreRegistration> {
        let record = PreRegistration {
            id: Uuid::new_v4().to_string(),
            email: data.email,
            name: data.name,
            company: data.company,
            use_case: data.use_case,
            created_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO pre_registrations (id, email, name, company, use_case, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.name)
        .bind(&record.company)
        .bind(&record.use_case)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// List pre-registrations, oldest first
    pub async fn list_pre_registrations(&self) -> Result<Vec<PreRegistration>> {
        let rows = sqlx::query("SELECT * FROM pre_registrations ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| PreRegistration {
                id: row.get("id"),
                email: row.get("email"),
                name: row.get("name"),
                company: row.get("company"),
                use_case: row.get("use_case"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Delete a project by id
    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn flow_column(project: &Project) -> Result<Option<String>> {
    match &project.flow_json {
        Some(flow) => Ok(Some(serde_json::to_string(flow)?)),
        None => Ok(None),
    }
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Project> {
    let flow_json: Option<String> = row.get("flow_json");
    let status: String = row.get("status");

    Ok(Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        flow_json: flow_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
        prompt: row.get("prompt"),
        status: ProjectStatus::parse(&status),
        deployed_webhook_url: row.get("deployed_webhook_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
