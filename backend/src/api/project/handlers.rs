//! Handler functions for project API endpoints.
//!
//! Projects are returned with their tasks embedded.

use crate::api::common::{
    ApiError, ApiJson, ApiResponse, not_found_as_bad_request, service_error_to_http,
};
use crate::database::models::{Project, ProjectDto};
use crate::services::project_service::ProjectService;
use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Json as ResponseJson, Response},
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn get_projects(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<Vec<Project>>, ApiError> {
    let service = ProjectService::new(&pool);

    match service.get_all_projects().await {
        Ok(projects) => Ok(ResponseJson(projects)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_project(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<Project>, ApiError> {
    let service = ProjectService::new(&pool);

    match service.get_project_required(id).await {
        Ok(project) => Ok(ResponseJson(project)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Responds 201 with the new project and its location.
#[axum::debug_handler]
pub async fn create_project(
    Extension(pool): Extension<SqlitePool>,
    ApiJson(payload): ApiJson<ProjectDto>,
) -> Result<Response, ApiError> {
    let service = ProjectService::new(&pool);

    match service.create_project(payload).await {
        Ok(project) => {
            let location = format!("/api/Projects/{}", project.id);
            Ok((
                StatusCode::CREATED,
                [(LOCATION, location)],
                ResponseJson(project),
            )
                .into_response())
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_project(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<ProjectDto>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let service = ProjectService::new(&pool);

    match service.update_project(id, payload).await {
        Ok(_) => Ok(ResponseJson(ApiResponse::message(
            "Project updated successfully.",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deleting an unknown project is a bad request, not a 404.
#[axum::debug_handler]
pub async fn delete_project(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let service = ProjectService::new(&pool);

    match service.delete_project(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}
