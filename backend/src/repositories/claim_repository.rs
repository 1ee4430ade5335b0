//! Database repository for claims attached to users and roles.

use crate::database::models::Claim;
use anyhow::Result;
use sqlx::SqlitePool;

pub struct ClaimRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ClaimRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Claims attached directly to a user, in insertion order.
    pub async fn get_user_claims(&self, user_id: &str) -> Result<Vec<Claim>> {
        let claims = sqlx::query_as::<_, Claim>(
            "SELECT claim_type, claim_value FROM user_claims WHERE user_id = ? ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(claims)
    }

    /// Claims attached to a role, in insertion order.
    pub async fn get_role_claims(&self, role_id: &str) -> Result<Vec<Claim>> {
        let claims = sqlx::query_as::<_, Claim>(
            "SELECT claim_type, claim_value FROM role_claims WHERE role_id = ? ORDER BY id ASC",
        )
        .bind(role_id)
        .fetch_all(self.pool)
        .await?;

        Ok(claims)
    }

    pub async fn add_user_claim(&self, user_id: &str, claim: &Claim) -> Result<()> {
        sqlx::query("INSERT INTO user_claims (user_id, claim_type, claim_value) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&claim.claim_type)
            .bind(&claim.claim_value)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn add_role_claim(&self, role_id: &str, claim: &Claim) -> Result<()> {
        sqlx::query("INSERT INTO role_claims (role_id, claim_type, claim_value) VALUES (?, ?, ?)")
            .bind(role_id)
            .bind(&claim.claim_type)
            .bind(&claim.claim_value)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
