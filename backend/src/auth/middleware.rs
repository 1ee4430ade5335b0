//! Middleware for protecting authenticated routes and handling authorization.
//!
//! `jwt_auth` validates the bearer token and stores the decoded [`Claims`]
//! in the request extensions. `manager_auth` must run after it.

use crate::api::common::{ApiError, error_response, service_error_to_http};
use crate::errors::ServiceError;
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

fn unauthorized(message: &str) -> ApiError {
    error_response(StatusCode::UNAUTHORIZED, "unauthorized", message, None)
}

/// JWT authentication middleware
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let jwt_utils = request
        .extensions()
        .get::<Arc<JwtUtils>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("JwtUtils extension missing from request");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
                None,
            )
        })?;

    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    match jwt_utils.validate_token(token) {
        Ok(claims) => {
            tracing::debug!(
                "Authenticated {} for {}",
                claims.email().unwrap_or("unknown"),
                request.uri().path()
            );
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            Err(unauthorized("Invalid or expired token"))
        }
    }
}

/// Manager role authorization middleware
pub async fn manager_auth(request: Request, next: Next) -> Result<Response, ApiError> {
    // Set by jwt_auth
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    if !claims.is_manager() {
        tracing::warn!(
            "User {} with roles {:?} denied access to {}",
            claims.user_id().unwrap_or("unknown"),
            claims.roles(),
            request.uri().path()
        );
        return Err(service_error_to_http(ServiceError::permission_denied(
            "Manager role required",
        )));
    }

    Ok(next.run(request).await)
}
