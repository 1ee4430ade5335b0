//! Module for project API endpoints.

pub mod handlers;
pub mod routes;
