//! Authentication module for user registration, login and access control.
//!
//! This module provides the public interface for registration and login,
//! bearer token issuance, and the authorization middleware that guards
//! the administrative routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod token;
