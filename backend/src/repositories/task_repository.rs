//! Database repository for project task operations.

use crate::database::models::{ProjectTask, TaskDto};
use anyhow::Result;
use sqlx::SqlitePool;

/// Repository for task database operations.
pub struct TaskRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a task. The caller has already checked that the project exists.
    pub async fn create_task(&self, task: &TaskDto) -> Result<ProjectTask> {
        let task = sqlx::query_as::<_, ProjectTask>(
            r#"
            INSERT INTO tasks (title, description, deadline, is_completed, project_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, deadline, is_completed, project_id
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.is_completed)
        .bind(task.project_id)
        .fetch_one(self.pool)
        .await?;

        Ok(task)
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<Option<ProjectTask>> {
        let task = sqlx::query_as::<_, ProjectTask>(
            r#"
            SELECT id, title, description, deadline, is_completed, project_id
            FROM tasks WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(task)
    }

    pub async fn get_all_tasks(&self) -> Result<Vec<ProjectTask>> {
        let tasks = sqlx::query_as::<_, ProjectTask>(
            r#"
            SELECT id, title, description, deadline, is_completed, project_id
            FROM tasks ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    /// Tasks belonging to one project, ordered by ID.
    pub async fn get_tasks_by_project_id(&self, project_id: i64) -> Result<Vec<ProjectTask>> {
        let tasks = sqlx::query_as::<_, ProjectTask>(
            r#"
            SELECT id, title, description, deadline, is_completed, project_id
            FROM tasks WHERE project_id = ? ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    /// Overwrites every editable field of a task.
    ///
    /// # Returns
    /// The updated task, or `None` if no task has this ID
    pub async fn update_task(&self, id: i64, task: &TaskDto) -> Result<Option<ProjectTask>> {
        let task = sqlx::query_as::<_, ProjectTask>(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, deadline = ?, is_completed = ?, project_id = ?
            WHERE id = ?
            RETURNING id, title, description, deadline, is_completed, project_id
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.is_completed)
        .bind(task.project_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(task)
    }

    /// # Returns
    /// `true` if a row was deleted
    pub async fn delete_task(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
