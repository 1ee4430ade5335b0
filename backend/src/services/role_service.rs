//! Role administration service.
//!
//! Handles role creation, role membership, and the claims attached to users
//! and roles. Every operation validates input presence only; the rules about
//! what a role or claim means live with whoever consumes the token.

use crate::database::models::{Claim, Role, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::claim_repository::ClaimRepository;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use crate::utils::jwt::{MANAGER_ROLE, RESERVED_CLAIMS};
use sqlx::SqlitePool;

/// Service layer for role operations.
pub struct RoleService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> RoleService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new role.
    ///
    /// # Errors
    /// - `Validation` when the name is blank
    /// - `AlreadyExists` when a role with this name exists
    pub async fn create_role(&self, role_name: &str) -> ServiceResult<Role> {
        let role_name = require_present(role_name, "Role name cannot be empty")?;

        let role = RoleRepository::new(self.pool)
            .create_role(role_name)
            .await?
            .ok_or_else(|| ServiceError::already_exists("Role", role_name))?;
        tracing::info!("Role {} added successfully", role.name);
        Ok(role)
    }

    pub async fn get_all_roles(&self) -> ServiceResult<Vec<Role>> {
        Ok(RoleRepository::new(self.pool).get_all_roles().await?)
    }

    /// Adds the user identified by `email` to `role_name`.
    ///
    /// # Errors
    /// - `Validation` when either input is blank
    /// - `NotFound` when the user or role does not exist
    /// - `AlreadyExists` when the user already holds the role
    pub async fn add_user_to_role(&self, email: &str, role_name: &str) -> ServiceResult<User> {
        let (email, role_name) = require_pair(email, role_name)?;

        let user = UserService::new(self.pool)
            .get_user_by_email_required(email)
            .await?;
        let role = self.get_role_required(role_name).await?;

        let repo = RoleRepository::new(self.pool);
        if !repo.add_user_to_role(&user.id, &role.id).await? {
            return Err(ServiceError::already_exists(
                "Role membership",
                format!("{} in {}", user.email, role.name),
            ));
        }
        tracing::info!("User {} added to the {} role", user.email, role.name);
        Ok(user)
    }

    /// Removes the user identified by `email` from `role_name`.
    ///
    /// # Errors
    /// - `Validation` when either input is blank
    /// - `NotFound` when the user or role does not exist
    /// - `InvalidOperation` when the user does not hold the role
    pub async fn remove_user_from_role(&self, email: &str, role_name: &str) -> ServiceResult<User> {
        let (email, role_name) = require_pair(email, role_name)?;

        let user = UserService::new(self.pool)
            .get_user_by_email_required(email)
            .await?;
        let role = self.get_role_required(role_name).await?;

        let removed = RoleRepository::new(self.pool)
            .remove_user_from_role(&user.id, &role.id)
            .await?;
        if !removed {
            tracing::warn!("User {} is not in the {} role", user.email, role.name);
            return Err(ServiceError::invalid_operation(format!(
                "Unable to remove user {} from the {} role",
                user.email, role.name
            )));
        }

        tracing::info!("User {} removed from the {} role", user.email, role.name);
        Ok(user)
    }

    /// Names of the roles held by the user identified by `email`.
    pub async fn get_user_roles(&self, email: &str) -> ServiceResult<Vec<String>> {
        let email = require_present(email, "Email cannot be empty")?;
        let user = UserService::new(self.pool)
            .get_user_by_email_required(email)
            .await?;

        Ok(RoleRepository::new(self.pool)
            .get_user_role_names(&user.id)
            .await?)
    }

    /// Attaches a claim directly to a user.
    pub async fn add_claim_to_user(
        &self,
        email: &str,
        claim_type: &str,
        claim_value: &str,
    ) -> ServiceResult<Claim> {
        let email = require_present(email, "Email cannot be empty")?;
        let claim = build_claim(claim_type, claim_value)?;

        let user = UserService::new(self.pool)
            .get_user_by_email_required(email)
            .await?;
        ClaimRepository::new(self.pool)
            .add_user_claim(&user.id, &claim)
            .await?;

        tracing::info!("Claim {} added to user {}", claim.claim_type, user.email);
        Ok(claim)
    }

    /// Attaches a claim to a role; every member inherits it in new tokens.
    pub async fn add_claim_to_role(
        &self,
        role_name: &str,
        claim_type: &str,
        claim_value: &str,
    ) -> ServiceResult<Claim> {
        let role_name = require_present(role_name, "Role name cannot be empty")?;
        let claim = build_claim(claim_type, claim_value)?;

        let role = self.get_role_required(role_name).await?;
        ClaimRepository::new(self.pool)
            .add_role_claim(&role.id, &claim)
            .await?;

        tracing::info!("Claim {} added to role {}", claim.claim_type, role.name);
        Ok(claim)
    }

    /// Makes sure the manager role exists and, if the account behind `email`
    /// has registered, that it holds the role.
    ///
    /// Safe to call repeatedly. Returns whether the account is now a manager.
    pub async fn bootstrap_manager(&self, email: &str) -> ServiceResult<bool> {
        let email = require_present(email, "Email cannot be empty")?;
        let repo = RoleRepository::new(self.pool);

        let role = match repo.get_role_by_name(MANAGER_ROLE).await? {
            Some(role) => role,
            None => match repo.create_role(MANAGER_ROLE).await? {
                Some(role) => {
                    tracing::info!("Role {} created for bootstrap", role.name);
                    role
                }
                // created concurrently
                None => self.get_role_required(MANAGER_ROLE).await?,
            },
        };

        let Some(user) = UserRepository::new(self.pool)
            .get_user_by_email(email)
            .await?
        else {
            tracing::info!("Bootstrap manager {} has not registered yet", email);
            return Ok(false);
        };

        if repo.add_user_to_role(&user.id, &role.id).await? {
            tracing::info!("User {} granted the {} role", user.email, role.name);
        }
        Ok(true)
    }

    async fn get_role_required(&self, role_name: &str) -> ServiceResult<Role> {
        RoleRepository::new(self.pool)
            .get_role_by_name(role_name)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", role_name))
    }
}

fn require_present<'v>(value: &'v str, message: &str) -> ServiceResult<&'v str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(message));
    }
    Ok(trimmed)
}

fn require_pair<'v>(email: &'v str, role_name: &'v str) -> ServiceResult<(&'v str, &'v str)> {
    if email.trim().is_empty() || role_name.trim().is_empty() {
        return Err(ServiceError::validation(
            "Email and role name cannot be empty",
        ));
    }
    Ok((email.trim(), role_name.trim()))
}

fn build_claim(claim_type: &str, claim_value: &str) -> ServiceResult<Claim> {
    let claim_type = require_present(claim_type, "Claim type cannot be empty")?;
    let claim_value = require_present(claim_value, "Claim value cannot be empty")?;
    if RESERVED_CLAIMS.contains(&claim_type) {
        return Err(ServiceError::validation(format!(
            "Claim type '{claim_type}' is reserved"
        )));
    }
    Ok(Claim::new(claim_type, claim_value))
}
