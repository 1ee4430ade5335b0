//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse the request body and hand it to
//! `auth::service` for validation, credential checks and token issuance.

use crate::api::common::{ApiError, ApiJson, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::{AuthService, ManagerBootstrap};
use crate::utils::jwt::JwtUtils;
use axum::{extract::Extension, response::Json as ResponseJson};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<Arc<JwtUtils>>,
    Extension(bootstrap): Extension<ManagerBootstrap>,
    ApiJson(payload): ApiJson<RegistrationRequest>,
) -> Result<ResponseJson<AuthResult>, ApiError> {
    let auth_service = AuthService::new(&pool, &jwt_utils).with_manager_bootstrap(&bootstrap);

    match auth_service.register(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<Arc<JwtUtils>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<ResponseJson<AuthResult>, ApiError> {
    let auth_service = AuthService::new(&pool, &jwt_utils);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
