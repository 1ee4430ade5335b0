//! Handler functions for role and claim administration.
//!
//! Inputs arrive as query parameters. Every failure here, including a
//! missing user or role, is reported as 400.

use crate::api::common::{ApiError, ApiResponse, not_found_as_bad_request};
use crate::database::models::{Claim, Role, User};
use crate::services::role_service::RoleService;
use crate::services::user_service::UserService;
use axum::{
    extract::{Extension, Query},
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleQuery {
    pub role_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipQuery {
    pub email: Option<String>,
    pub role_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaimQuery {
    pub email: Option<String>,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleClaimQuery {
    pub role_name: Option<String>,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}

/// Absent parameters are treated as blank and rejected by the service.
fn param(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

#[axum::debug_handler]
pub async fn get_all_roles(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<Vec<Role>>, ApiError> {
    match RoleService::new(&pool).get_all_roles().await {
        Ok(roles) => Ok(ResponseJson(roles)),
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn create_role(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<RoleQuery>,
) -> Result<ResponseJson<ApiResponse<Role>>, ApiError> {
    match RoleService::new(&pool).create_role(param(&query.role_name)).await {
        Ok(role) => {
            let message = format!("Role {} added successfully", role.name);
            Ok(ResponseJson(ApiResponse::success(role, message)))
        }
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn get_all_users(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<Vec<User>>, ApiError> {
    match UserService::new(&pool).get_all_users().await {
        Ok(users) => Ok(ResponseJson(users)),
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn add_user_to_role(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<MembershipQuery>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let role_name = param(&query.role_name);

    match RoleService::new(&pool)
        .add_user_to_role(param(&query.email), role_name)
        .await
    {
        Ok(user) => Ok(ResponseJson(ApiResponse::message(format!(
            "User {} added to the {} role",
            user.email, role_name
        )))),
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn get_user_roles(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<EmailQuery>,
) -> Result<ResponseJson<Vec<String>>, ApiError> {
    match RoleService::new(&pool).get_user_roles(param(&query.email)).await {
        Ok(roles) => Ok(ResponseJson(roles)),
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn remove_user_from_role(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<MembershipQuery>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let role_name = param(&query.role_name);

    match RoleService::new(&pool)
        .remove_user_from_role(param(&query.email), role_name)
        .await
    {
        Ok(user) => Ok(ResponseJson(ApiResponse::message(format!(
            "User {} removed from the {} role",
            user.email, role_name
        )))),
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn add_claim_to_user(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<UserClaimQuery>,
) -> Result<ResponseJson<ApiResponse<Claim>>, ApiError> {
    let email = param(&query.email);

    match RoleService::new(&pool)
        .add_claim_to_user(email, param(&query.claim_type), param(&query.claim_value))
        .await
    {
        Ok(claim) => {
            let message = format!("Claim {} added to user {}", claim.claim_type, email);
            Ok(ResponseJson(ApiResponse::success(claim, message)))
        }
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}

#[axum::debug_handler]
pub async fn add_claim_to_role(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<RoleClaimQuery>,
) -> Result<ResponseJson<ApiResponse<Claim>>, ApiError> {
    let role_name = param(&query.role_name);

    match RoleService::new(&pool)
        .add_claim_to_role(
            role_name,
            param(&query.claim_type),
            param(&query.claim_value),
        )
        .await
    {
        Ok(claim) => {
            let message = format!("Claim {} added to role {}", claim.claim_type, role_name);
            Ok(ResponseJson(ApiResponse::success(claim, message)))
        }
        Err(error) => Err(not_found_as_bad_request(error)),
    }
}
