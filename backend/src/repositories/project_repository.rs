//! Database repository for project operations.
//!
//! Provides CRUD operations for projects. Tasks are loaded separately through
//! `TaskRepository` and attached by the service layer.

use crate::database::models::{Project, ProjectDto};
use anyhow::Result;
use sqlx::SqlitePool;

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a project and returns it with its generated ID.
    pub async fn create_project(&self, project: &ProjectDto) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, start_date, end_date)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, description, start_date, end_date
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .fetch_one(self.pool)
        .await?;

        Ok(project)
    }

    /// Retrieves a project by ID, without its tasks.
    ///
    /// # Returns
    /// `Some(Project)` if found, `None` otherwise
    pub async fn get_project_by_id(&self, id: i64) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, start_date, end_date FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }

    /// Retrieves every project ordered by ID, without tasks.
    pub async fn get_all_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, start_date, end_date FROM projects ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(projects)
    }

    /// Checks whether a project with the given ID exists.
    pub async fn project_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Overwrites every editable field of a project.
    ///
    /// # Returns
    /// The updated project, or `None` if no project has this ID
    pub async fn update_project(&self, id: i64, project: &ProjectDto) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = ?, description = ?, start_date = ?, end_date = ?
            WHERE id = ?
            RETURNING id, name, description, start_date, end_date
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project. Its tasks are removed by the foreign key cascade.
    ///
    /// # Returns
    /// `true` if a row was deleted
    pub async fn delete_project(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
