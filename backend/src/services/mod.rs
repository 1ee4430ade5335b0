//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between repositories, such as registering
//! users, administering roles, and managing projects and their tasks.

pub mod credential_store;
pub mod project_service;
pub mod role_service;
pub mod task_service;
pub mod user_service;
