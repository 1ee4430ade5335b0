//! Defines the HTTP routes specifically for authentication.
//!
//! Both routes are public; they are how a caller obtains a bearer token.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/Register", post(register))
        .route("/Login", post(login))
}
