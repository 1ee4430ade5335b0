//! Handler functions for task API endpoints.

use crate::api::common::{ApiError, ApiJson, service_error_to_http};
use crate::database::models::{ProjectTask, TaskDto};
use crate::services::task_service::TaskService;
use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Json as ResponseJson, Response},
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn get_tasks(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<Vec<ProjectTask>>, ApiError> {
    match TaskService::new(&pool).get_all_tasks().await {
        Ok(tasks) => Ok(ResponseJson(tasks)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_task(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ProjectTask>, ApiError> {
    match TaskService::new(&pool).get_task_required(id).await {
        Ok(task) => Ok(ResponseJson(task)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// A task referencing an unknown project is rejected with 404.
#[axum::debug_handler]
pub async fn create_task(
    Extension(pool): Extension<SqlitePool>,
    ApiJson(payload): ApiJson<TaskDto>,
) -> Result<Response, ApiError> {
    match TaskService::new(&pool).create_task(payload).await {
        Ok(task) => {
            let location = format!("/api/Tasks/{}", task.id);
            Ok((StatusCode::CREATED, [(LOCATION, location)], ResponseJson(task)).into_response())
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_task(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<TaskDto>,
) -> Result<StatusCode, ApiError> {
    match TaskService::new(&pool).update_task(id, payload).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_task(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    match TaskService::new(&pool).delete_task(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(error) => Err(service_error_to_http(error)),
    }
}
