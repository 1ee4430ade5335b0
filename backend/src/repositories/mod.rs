//! Data access layer.
//!
//! Each repository wraps a borrowed `SqlitePool` and runs plain SQL for one
//! table group. Repositories return `anyhow::Result`; services turn failures
//! into `ServiceError`.

pub mod claim_repository;
pub mod project_repository;
pub mod role_repository;
pub mod task_repository;
pub mod user_repository;

/// Whether `error` is a UNIQUE or PRIMARY KEY constraint failure.
///
/// Lets repositories report a lost insert race as a typed outcome instead of
/// a database error.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(e) if e.is_unique_violation())
}
