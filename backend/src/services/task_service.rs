//! Task business logic service.
//!
//! Every create and update checks that the referenced project exists.

use crate::database::models::{ProjectTask, TaskDto};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::task_repository::TaskRepository;
use sqlx::SqlitePool;
use validator::Validate;

/// Service layer for task operations.
pub struct TaskService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> TaskService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_tasks(&self) -> ServiceResult<Vec<ProjectTask>> {
        Ok(TaskRepository::new(self.pool).get_all_tasks().await?)
    }

    /// Retrieves a task by ID.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the task doesn't exist
    pub async fn get_task_required(&self, id: i64) -> ServiceResult<ProjectTask> {
        TaskRepository::new(self.pool)
            .get_task_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id.to_string()))
    }

    /// Creates a task under an existing project.
    ///
    /// # Errors
    /// - `Validation` for invalid input
    /// - `NotFound` if the referenced project doesn't exist; nothing is written
    pub async fn create_task(&self, task: TaskDto) -> ServiceResult<ProjectTask> {
        if let Err(validation_errors) = task.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        self.ensure_project_exists(task.project_id).await?;

        let task = TaskRepository::new(self.pool).create_task(&task).await?;
        tracing::info!("Task {} created in project {}", task.id, task.project_id);
        Ok(task)
    }

    /// Replaces a task's fields, possibly moving it to another project.
    ///
    /// # Errors
    /// - `Validation` for invalid input
    /// - `NotFound` if the task or the referenced project doesn't exist
    pub async fn update_task(&self, id: i64, task: TaskDto) -> ServiceResult<ProjectTask> {
        if let Err(validation_errors) = task.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let repo = TaskRepository::new(self.pool);
        if repo.get_task_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Task", id.to_string()));
        }

        self.ensure_project_exists(task.project_id).await?;

        repo.update_task(id, &task)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id.to_string()))
    }

    pub async fn delete_task(&self, id: i64) -> ServiceResult<()> {
        let deleted = TaskRepository::new(self.pool).delete_task(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Task", id.to_string()));
        }
        tracing::info!("Task {} deleted", id);
        Ok(())
    }

    async fn ensure_project_exists(&self, project_id: i64) -> ServiceResult<()> {
        if !ProjectRepository::new(self.pool)
            .project_exists(project_id)
            .await?
        {
            return Err(ServiceError::not_found("Project", project_id.to_string()));
        }
        Ok(())
    }
}
