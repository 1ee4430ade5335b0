//! JWT token utilities for authentication and authorization.
//!
//! Provides token signing, validation, and claims management for
//! user authentication and role-based access control.
//!
//! A token payload is an open set of string claims plus the registered
//! `nbf`, `iat` and `exp` timestamps. Claim keys may repeat: a key that
//! occurs once is written as a string member, a key that occurs more than
//! once is written as an array holding every value in order.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Config, MIN_JWT_SECRET_LEN};
use crate::database::models::Claim;
use crate::errors::ServiceError;

/// Custom claim carrying the user ID.
pub const CLAIM_ID: &str = "Id";
/// Subject. Holds the user's email.
pub const CLAIM_SUB: &str = "sub";
pub const CLAIM_EMAIL: &str = "email";
/// Unique token identifier.
pub const CLAIM_JTI: &str = "jti";
/// Identity-provider user ID.
pub const CLAIM_NAME_ID: &str = "nameid";
/// Identity-provider username.
pub const CLAIM_UNIQUE_NAME: &str = "unique_name";
pub const CLAIM_ROLE: &str = "role";

/// Role required by the administrative routes.
pub const MANAGER_ROLE: &str = "manager";

/// Registered timestamp members owned by the token itself.
pub const RESERVED_CLAIMS: [&str; 3] = ["nbf", "iat", "exp"];

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Every non-registered claim, duplicates included.
    pub claims: Vec<Claim>,
    /// Not-before timestamp
    pub nbf: i64,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// All values recorded under `claim_type`, in order.
    pub fn values<'a>(&'a self, claim_type: &str) -> impl Iterator<Item = &'a str> {
        self.claims
            .iter()
            .filter(move |claim| claim.claim_type == claim_type)
            .map(|claim| claim.claim_value.as_str())
    }

    /// First value recorded under `claim_type`.
    pub fn first(&self, claim_type: &str) -> Option<&str> {
        self.values(claim_type).next()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.first(CLAIM_ID)
    }

    pub fn email(&self) -> Option<&str> {
        self.first(CLAIM_EMAIL)
    }

    pub fn roles(&self) -> Vec<&str> {
        self.values(CLAIM_ROLE).collect()
    }

    /// Check if user has specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.values(CLAIM_ROLE)
            .any(|value| value.eq_ignore_ascii_case(role))
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(MANAGER_ROLE)
    }

    /// Groups claim values by key, keeping the order in which keys first appear.
    fn grouped(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for claim in &self.claims {
            // the registered timestamps are written from the struct fields
            if RESERVED_CLAIMS.contains(&claim.claim_type.as_str()) {
                continue;
            }
            match groups
                .iter_mut()
                .find(|(key, _)| *key == claim.claim_type.as_str())
            {
                Some((_, values)) => values.push(claim.claim_value.as_str()),
                None => groups.push((claim.claim_type.as_str(), vec![claim.claim_value.as_str()])),
            }
        }
        groups
    }
}

impl Serialize for Claims {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let groups = self.grouped();
        let mut map = serializer.serialize_map(Some(groups.len() + RESERVED_CLAIMS.len()))?;
        for (key, values) in &groups {
            match values.as_slice() {
                [single] => map.serialize_entry(key, single)?,
                many => map.serialize_entry(key, many)?,
            }
        }
        map.serialize_entry("nbf", &self.nbf)?;
        map.serialize_entry("iat", &self.iat)?;
        map.serialize_entry("exp", &self.exp)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Claims {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default)]
            nbf: i64,
            #[serde(default)]
            iat: i64,
            exp: i64,
            #[serde(flatten)]
            rest: serde_json::Map<String, Value>,
        }

        let payload = Payload::deserialize(deserializer)?;
        let mut claims = Vec::new();
        for (key, value) in payload.rest {
            match value {
                Value::Array(items) => {
                    claims.extend(items.into_iter().map(|item| Claim::new(key.clone(), value_to_string(item))))
                }
                other => claims.push(Claim::new(key, value_to_string(other))),
            }
        }

        Ok(Claims {
            claims,
            nbf: payload.nbf,
            iat: payload.iat,
            exp: payload.exp,
        })
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from a shared secret.
    ///
    /// Fails when the secret is shorter than [`MIN_JWT_SECRET_LEN`] so that a
    /// misconfigured deployment stops at startup instead of on first login.
    pub fn new(secret: &str, expires_in_seconds: u64) -> Result<Self, ServiceError> {
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ServiceError::validation(format!(
                "JWT secret must be at least {MIN_JWT_SECRET_LEN} bytes long"
            )));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Ok(JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(&config.jwt_secret, config.jwt_expires_in_seconds)
    }

    /// Token lifetime in seconds.
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Signs a token carrying `claims`, valid from now for the configured lifetime.
    pub fn generate_token(&self, claims: Vec<Claim>) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            claims,
            nbf: now.timestamp(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        self.encode_claims(&claims)
    }

    /// Signs an already assembled payload as it is.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(&Header::new(Algorithm::HS512), claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::validation(format!("Token validation failed: {}", e)))
    }
}

#[cfg(test)]
pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs512-signing";
