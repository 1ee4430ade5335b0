//! Project business logic service.
//!
//! Projects are always returned with their tasks attached.

use crate::database::models::{Project, ProjectDto, ProjectTask};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::task_repository::TaskRepository;
use sqlx::SqlitePool;
use std::collections::HashMap;
use validator::Validate;

/// Service layer for project operations.
pub struct ProjectService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> ProjectService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists every project together with its tasks.
    pub async fn get_all_projects(&self) -> ServiceResult<Vec<Project>> {
        let mut projects = ProjectRepository::new(self.pool).get_all_projects().await?;
        let tasks = TaskRepository::new(self.pool).get_all_tasks().await?;

        let mut by_project: HashMap<i64, Vec<ProjectTask>> = HashMap::new();
        for task in tasks {
            by_project.entry(task.project_id).or_default().push(task);
        }
        for project in &mut projects {
            project.tasks = by_project.remove(&project.id).unwrap_or_default();
        }

        Ok(projects)
    }

    /// Retrieves a project and its tasks.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the project doesn't exist
    pub async fn get_project_required(&self, id: i64) -> ServiceResult<Project> {
        let mut project = ProjectRepository::new(self.pool)
            .get_project_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id.to_string()))?;

        project.tasks = TaskRepository::new(self.pool)
            .get_tasks_by_project_id(id)
            .await?;
        Ok(project)
    }

    /// Creates a new project with full validation.
    pub async fn create_project(&self, project: ProjectDto) -> ServiceResult<Project> {
        if let Err(validation_errors) = project.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let project = ProjectRepository::new(self.pool)
            .create_project(&project)
            .await?;
        tracing::info!("Project {} created", project.id);
        Ok(project)
    }

    /// Replaces a project's fields.
    ///
    /// # Errors
    /// - `Validation` for invalid input
    /// - `NotFound` if the project doesn't exist
    pub async fn update_project(&self, id: i64, project: ProjectDto) -> ServiceResult<Project> {
        if let Err(validation_errors) = project.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let updated = ProjectRepository::new(self.pool)
            .update_project(id, &project)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id.to_string()))?;
        Ok(updated)
    }

    /// Deletes a project together with its tasks.
    pub async fn delete_project(&self, id: i64) -> ServiceResult<()> {
        let deleted = ProjectRepository::new(self.pool).delete_project(id).await?;
        if !deleted {
            return Err(ServiceError::not_found("Project", id.to_string()));
        }
        tracing::info!("Project {} deleted", id);
        Ok(())
    }
}
