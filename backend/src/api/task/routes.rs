//! Defines the HTTP routes for task management.

use super::handlers::*;
use crate::auth::middleware::{jwt_auth, manager_auth};
use axum::{Router, middleware, routing::get};

/// Routes mounted under `/api/Tasks`.
pub fn task_router(protect: bool) -> Router {
    let router = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task));

    if protect {
        router
            .route_layer(middleware::from_fn(manager_auth))
            .route_layer(middleware::from_fn(jwt_auth))
    } else {
        router
    }
}
