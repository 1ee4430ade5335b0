//! Defines the HTTP routes for project management.

use super::handlers::*;
use crate::auth::middleware::{jwt_auth, manager_auth};
use axum::{Router, middleware, routing::get};

/// Routes mounted under `/api/Projects`.
///
/// With `protect` set every route requires a manager token.
pub fn project_router(protect: bool) -> Router {
    let router = Router::new()
        .route("/", get(get_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project).put(update_project).delete(delete_project),
        );

    if protect {
        // last added runs first
        router
            .route_layer(middleware::from_fn(manager_auth))
            .route_layer(middleware::from_fn(jwt_auth))
    } else {
        router
    }
}
