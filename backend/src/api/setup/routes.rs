//! Defines the HTTP routes for role and claim administration.
//!
//! Every route requires a bearer token carrying the manager role.

use super::handlers::*;
use crate::auth::middleware::{jwt_auth, manager_auth};
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Routes mounted under `/api/Setup`.
pub fn setup_router() -> Router {
    Router::new()
        .route("/GetAllRoles", get(get_all_roles))
        .route("/CreateRole", post(create_role))
        .route("/GetAllUsers", get(get_all_users))
        .route("/AddUserToRole", post(add_user_to_role))
        .route("/GetUserRoles", get(get_user_roles))
        .route("/RemoveUserFromRole", post(remove_user_from_role))
        .route("/AddClaimToUser", post(add_claim_to_user))
        .route("/AddClaimToRole", post(add_claim_to_role))
        .route_layer(middleware::from_fn(manager_auth))
        .route_layer(middleware::from_fn(jwt_auth))
}
