//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the API domains (projects,
//! tasks and role administration), excluding the authentication routes
//! which are handled separately.

pub mod common;
pub mod project;
pub mod setup;
pub mod task;
