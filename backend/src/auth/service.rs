//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::auth::token::TokenIssuer;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::credential_store::{CredentialStore, SqliteCredentialStore};
use crate::services::role_service::RoleService;
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtUtils;
use sqlx::SqlitePool;
use validator::Validate;

/// The account that becomes a manager as soon as it registers.
#[derive(Debug, Clone, Default)]
pub struct ManagerBootstrap {
    pub email: Option<String>,
}

impl ManagerBootstrap {
    pub fn new(email: Option<String>) -> Self {
        Self { email }
    }

    /// Emails compare case-insensitively, as they do in the store.
    pub fn matches(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|bootstrap| bootstrap.eq_ignore_ascii_case(email))
    }
}

/// Authentication service for handling registration, login and token issuance
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: &'a JwtUtils,
    user_service: UserService<'a>,
    store: SqliteCredentialStore<'a>,
    bootstrap: Option<&'a ManagerBootstrap>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, jwt_utils: &'a JwtUtils) -> Self {
        AuthService {
            pool,
            jwt_utils,
            user_service: UserService::new(pool),
            store: SqliteCredentialStore::new(pool),
            bootstrap: None,
        }
    }

    /// Grants the manager role to the bootstrap account when it registers.
    pub fn with_manager_bootstrap(mut self, bootstrap: &'a ManagerBootstrap) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Register a new user and sign them in.
    ///
    /// Unlike login, a duplicate email is reported as such.
    pub async fn register(&self, request: RegistrationRequest) -> ServiceResult<AuthResult> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let user = self
            .user_service
            .register_user(&request.email, &request.password)
            .await
            .inspect_err(|e| tracing::warn!("Registration rejected: {}", e))?;

        if self.bootstrap.is_some_and(|b| b.matches(&user.email)) {
            RoleService::new(self.pool)
                .bootstrap_manager(&user.email)
                .await?;
        }

        self.auth_result(&user).await
    }

    /// Authenticate user and generate a JWT token.
    ///
    /// Unknown emails and wrong passwords produce the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResult> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let Some(user) = self.store.find_user_by_email(&request.email).await? else {
            tracing::warn!("Login failed: unknown account");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.store.check_password(&user, &request.password).await? {
            tracing::warn!("Login failed for user {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        self.auth_result(&user).await
    }

    async fn auth_result(&self, user: &crate::database::models::User) -> ServiceResult<AuthResult> {
        let token = TokenIssuer::new(self.jwt_utils, &self.store)
            .issue_token(user)
            .await?;

        Ok(AuthResult {
            result: true,
            token,
            expires_in: self.jwt_utils.expires_in_seconds(),
        })
    }
}
