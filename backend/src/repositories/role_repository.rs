//! Database repository for role management operations.
//!
//! Provides access to system roles and role membership with:
//! - Role creation and lookup by name
//! - Complete role listing
//! - Assigning users to roles and removing them again
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::Role;
use crate::repositories::is_unique_violation;

/// Repository for role database operations.
///
/// Handles the Role entity and the `user_roles` join table.
pub struct RoleRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> RoleRepository<'a> {
    /// Creates a new RoleRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a role with a freshly generated identifier.
    ///
    /// # Returns
    /// The new role, or `None` when the name is already taken
    pub async fn create_role(&self, name: &str) -> Result<Option<Role>> {
        let result = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(role) => Ok(Some(role)),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a role by its name.
    ///
    /// # Arguments
    /// * `name` - Role name to search for (case-insensitive)
    ///
    /// # Returns
    /// `Some(Role)` if found, `None` otherwise
    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role =
            sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE name = ?")
                .bind(name)
                .fetch_optional(self.pool)
                .await?;

        Ok(role)
    }

    /// Retrieves all roles in the system.
    pub async fn get_all_roles(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at FROM roles ORDER BY created_at ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(roles)
    }

    /// Adds the user to the role.
    ///
    /// # Returns
    /// `false` if the user already held the role
    pub async fn add_user_to_role(&self, user_id: &str, role_id: &str) -> Result<bool> {
        let result = sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(self.pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the user from the role.
    ///
    /// # Returns
    /// `true` if a membership row was deleted
    pub async fn remove_user_from_role(&self, user_id: &str, role_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = ? AND role_id = ?")
            .bind(user_id)
            .bind(role_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Names of every role the user holds.
    pub async fn get_user_role_names(&self, user_id: &str) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON ur.role_id = r.id
            WHERE ur.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }
}
