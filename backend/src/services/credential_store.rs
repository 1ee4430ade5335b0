//! Credential store abstraction used by authentication and token issuance.
//!
//! The store owns user records, password verification and role membership.
//! `SqliteCredentialStore` is the production implementation; tests swap in
//! in-memory stores to control role and claim enumeration precisely.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{Claim, Role, User};
use crate::errors::ServiceResult;
use crate::repositories::claim_repository::ClaimRepository;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks a user up by email. Unknown emails yield `None`.
    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    /// Verifies `password` against the user's stored credential.
    async fn check_password(&self, user: &User, password: &str) -> ServiceResult<bool>;

    /// Claims attached directly to the user.
    async fn get_user_claims(&self, user: &User) -> ServiceResult<Vec<Claim>>;

    /// Names of the roles the user belongs to.
    async fn get_user_roles(&self, user: &User) -> ServiceResult<Vec<String>>;

    async fn find_role_by_name(&self, name: &str) -> ServiceResult<Option<Role>>;

    async fn get_role_claims(&self, role: &Role) -> ServiceResult<Vec<Claim>>;
}

/// Credential store backed by the application's SQLite database.
pub struct SqliteCredentialStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SqliteCredentialStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore<'_> {
    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(UserRepository::new(self.pool).get_user_by_email(email).await?)
    }

    async fn check_password(&self, user: &User, password: &str) -> ServiceResult<bool> {
        UserService::verify_password(password, &user.password_hash)
    }

    async fn get_user_claims(&self, user: &User) -> ServiceResult<Vec<Claim>> {
        Ok(ClaimRepository::new(self.pool).get_user_claims(&user.id).await?)
    }

    async fn get_user_roles(&self, user: &User) -> ServiceResult<Vec<String>> {
        Ok(RoleRepository::new(self.pool)
            .get_user_role_names(&user.id)
            .await?)
    }

    async fn find_role_by_name(&self, name: &str) -> ServiceResult<Option<Role>> {
        Ok(RoleRepository::new(self.pool).get_role_by_name(name).await?)
    }

    async fn get_role_claims(&self, role: &Role) -> ServiceResult<Vec<Claim>> {
        Ok(ClaimRepository::new(self.pool).get_role_claims(&role.id).await?)
    }
}
