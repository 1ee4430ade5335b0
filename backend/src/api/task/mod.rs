//! Module for task API endpoints.
//!
//! Tasks always belong to an existing project.

pub mod handlers;
pub mod routes;
