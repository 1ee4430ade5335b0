//! Module for administrative endpoints: roles, memberships and claims.

pub mod handlers;
pub mod routes;
