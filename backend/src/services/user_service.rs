//! User business logic service.
//!
//! Handles registration, password hashing and verification, and user lookups.

use crate::database::models::{CreateUser, User};
use crate::errors::{FieldError, ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Hashing cost; tests use the cheapest cost bcrypt accepts.
const BCRYPT_COST: u32 = if cfg!(test) { 4 } else { DEFAULT_COST };

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers a new user. The email doubles as the username.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - An email that is already registered
    /// - Passwords that violate the password policy
    pub async fn register_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        if repo.email_exists(email).await? {
            return Err(ServiceError::already_exists("Email", email));
        }

        let violations = password_policy_violations(password);
        if !violations.is_empty() {
            let message = violations.join(" ");
            let details = violations
                .into_iter()
                .map(|violation| FieldError::new("password", violation))
                .collect();
            return Err(ServiceError::validation_with_details(message, details));
        }

        let password_hash = Self::hash_password(password)?;

        let data = CreateUser {
            id: Uuid::now_v7().to_string(),
            email: email.to_string(),
            username: email.to_string(),
            password_hash,
        };

        // a concurrent registration may have taken the email since the check
        let Some(user) = repo.create_user(data).await? else {
            tracing::warn!("Registration lost a race for an existing email");
            return Err(ServiceError::already_exists("Email", email));
        };
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Function to hash a password before storing in database
    ///
    /// # Errors
    /// Returns `ServiceError` if hashing fails
    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, BCRYPT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    ///
    /// # Returns
    /// `true` if password matches hash, `false` otherwise
    ///
    /// # Errors
    /// Returns `ServiceError` if the stored hash is unreadable
    pub fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }

    /// Retrieves a user by email with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_by_email_required(&self, email: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", email))?;
        Ok(user)
    }

    /// Retrieves every registered user.
    pub async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        let repo = UserRepository::new(self.pool);
        Ok(repo.get_all_users().await?)
    }
}

/// Checks a password against the default identity password rules.
///
/// Returns one message per violated rule; an empty list means the password
/// is acceptable.
pub fn password_policy_violations(password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(format!(
            "Passwords must be at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        violations.push("Passwords must have at least one non alphanumeric character.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Passwords must have at least one digit ('0'-'9').".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        violations.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        violations.push("Passwords must have at least one uppercase ('A'-'Z').".to_string());
    }

    violations
}
