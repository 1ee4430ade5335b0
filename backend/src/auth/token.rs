//! Bearer token issuance.
//!
//! Assembles the claim set for a user from the credential store and signs it.
//! Claims are appended in a fixed order: the base identity claims, the
//! user's own claims, then for each role a `role` claim followed by that
//! role's claims. Nothing is deduplicated, so a key may occur several times.

use uuid::Uuid;

use crate::database::models::{Claim, User};
use crate::errors::ServiceResult;
use crate::services::credential_store::CredentialStore;
use crate::utils::jwt::{
    CLAIM_EMAIL, CLAIM_ID, CLAIM_JTI, CLAIM_NAME_ID, CLAIM_ROLE, CLAIM_SUB, CLAIM_UNIQUE_NAME,
    JwtUtils,
};

pub struct TokenIssuer<'a> {
    jwt_utils: &'a JwtUtils,
    store: &'a dyn CredentialStore,
}

impl<'a> TokenIssuer<'a> {
    pub fn new(jwt_utils: &'a JwtUtils, store: &'a dyn CredentialStore) -> Self {
        Self { jwt_utils, store }
    }

    /// Builds the full claim set for `user`.
    pub async fn build_claims(&self, user: &User) -> ServiceResult<Vec<Claim>> {
        let mut claims = vec![
            Claim::new(CLAIM_ID, user.id.clone()),
            Claim::new(CLAIM_SUB, user.email.clone()),
            Claim::new(CLAIM_EMAIL, user.email.clone()),
            Claim::new(CLAIM_JTI, Uuid::new_v4().to_string()),
            Claim::new(CLAIM_NAME_ID, user.id.clone()),
            Claim::new(CLAIM_UNIQUE_NAME, user.username.clone()),
        ];

        claims.extend(self.store.get_user_claims(user).await?);

        for role_name in self.store.get_user_roles(user).await? {
            claims.push(Claim::new(CLAIM_ROLE, role_name.clone()));

            // a membership may outlive its role; it still yields the role claim
            if let Some(role) = self.store.find_role_by_name(&role_name).await? {
                claims.extend(self.store.get_role_claims(&role).await?);
            }
        }

        Ok(claims)
    }

    /// Issues a signed, time-bounded token for `user`.
    pub async fn issue_token(&self, user: &User) -> ServiceResult<String> {
        let claims = self.build_claims(user).await?;
        tracing::debug!("Issuing token for user {} with {} claims", user.id, claims.len());
        self.jwt_utils.generate_token(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::utils::jwt::TEST_SECRET;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        user_claims: Vec<Claim>,
        memberships: Vec<String>,
        roles: HashMap<String, Vec<Claim>>,
    }

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn find_user_by_email(&self, _email: &str) -> ServiceResult<Option<User>> {
            Ok(None)
        }

        async fn check_password(&self, _user: &User, _password: &str) -> ServiceResult<bool> {
            Ok(false)
        }

        async fn get_user_claims(&self, _user: &User) -> ServiceResult<Vec<Claim>> {
            Ok(self.user_claims.clone())
        }

        async fn get_user_roles(&self, _user: &User) -> ServiceResult<Vec<String>> {
            Ok(self.memberships.clone())
        }

        async fn find_role_by_name(&self, name: &str) -> ServiceResult<Option<Role>> {
            Ok(self.roles.contains_key(name).then(|| Role {
                id: format!("role-{name}"),
                name: name.to_string(),
                created_at: Utc::now(),
            }))
        }

        async fn get_role_claims(&self, role: &Role) -> ServiceResult<Vec<Claim>> {
            Ok(self.roles.get(&role.name).cloned().unwrap_or_default())
        }
    }

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn jwt() -> JwtUtils {
        JwtUtils::new(TEST_SECRET, 4 * 60 * 60).unwrap()
    }

    fn keys(claims: &[Claim]) -> Vec<&str> {
        claims.iter().map(|c| c.claim_type.as_str()).collect()
    }

    #[tokio::test]
    async fn test_base_claims_only() {
        let jwt = jwt();
        let store = MemoryStore::default();
        let claims = TokenIssuer::new(&jwt, &store)
            .build_claims(&user())
            .await
            .unwrap();

        assert_eq!(
            keys(&claims),
            vec!["Id", "sub", "email", "jti", "nameid", "unique_name"]
        );
        assert_eq!(claims[1].claim_value, "ada@example.com");
        assert_eq!(claims[2].claim_value, "ada@example.com");
        assert!(Uuid::parse_str(&claims[3].claim_value).is_ok());
    }

    #[tokio::test]
    async fn test_roles_and_claims_appended_in_order_without_dedup() {
        let jwt = jwt();
        let mut roles = HashMap::new();
        roles.insert(
            "manager".to_string(),
            vec![
                Claim::new("permission", "projects.write"),
                Claim::new("department", "ops"),
            ],
        );
        roles.insert(
            "auditor".to_string(),
            vec![Claim::new("permission", "projects.write")],
        );
        let store = MemoryStore {
            user_claims: vec![Claim::new("department", "ops"), Claim::new("email", "alt@example.com")],
            memberships: vec!["manager".to_string(), "auditor".to_string()],
            roles,
        };

        let claims = TokenIssuer::new(&jwt, &store)
            .build_claims(&user())
            .await
            .unwrap();

        assert_eq!(
            keys(&claims[6..]),
            vec![
                "department",
                "email",
                "role",
                "permission",
                "department",
                "role",
                "permission"
            ]
        );
        assert_eq!(claims[8].claim_value, "manager");
        assert_eq!(claims[11].claim_value, "auditor");

        let permissions = claims.iter().filter(|c| c.claim_type == "permission").count();
        assert_eq!(permissions, 2);
        let emails = claims.iter().filter(|c| c.claim_type == "email").count();
        assert_eq!(emails, 2);
    }

    #[tokio::test]
    async fn test_dangling_role_contributes_only_role_claim() {
        let jwt = jwt();
        let store = MemoryStore {
            memberships: vec!["retired".to_string()],
            ..Default::default()
        };

        let claims = TokenIssuer::new(&jwt, &store)
            .build_claims(&user())
            .await
            .unwrap();

        assert_eq!(claims.len(), 7);
        assert_eq!(claims[6], Claim::new("role", "retired"));
    }

    #[tokio::test]
    async fn test_issued_token_decodes_with_duplicates() {
        let jwt = jwt();
        let mut roles = HashMap::new();
        roles.insert("manager".to_string(), vec![Claim::new("scope", "admin")]);
        let store = MemoryStore {
            user_claims: vec![Claim::new("scope", "admin")],
            memberships: vec!["manager".to_string()],
            roles,
        };

        let token = TokenIssuer::new(&jwt, &store)
            .issue_token(&user())
            .await
            .unwrap();
        let decoded = jwt.validate_token(&token).unwrap();

        assert_eq!(decoded.values("scope").collect::<Vec<_>>(), vec!["admin", "admin"]);
        assert!(decoded.is_manager());
        assert_eq!(decoded.user_id(), Some("user-1"));
        assert_eq!(decoded.email(), Some("ada@example.com"));
        assert_eq!(decoded.exp - decoded.iat, 4 * 60 * 60);
        assert_eq!(decoded.claims.len(), 9);
    }
}
