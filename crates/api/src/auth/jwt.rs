//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs whose `sub` claim is the caller's
//! profile id. There is no role system: a valid token makes the caller an
//! authenticated principal, and ownership checks happen per resource in the
//! repositories.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use prepcall_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Profile id of the token holder.
    pub sub: DbId,
    /// Expiration (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token id (UUID v4), kept for audit trails.
    pub jti: String,
}

/// Signing secret and token lifetime.
///
/// Read from `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
/// (optional, defaults to one hour).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty, or if
    /// `JWT_ACCESS_EXPIRY_MINS` is set but not an integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Issue an access token for the given profile id.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: iat + config.access_token_expiry_mins * 60,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    let key = EncodingKey::from_secret(config.secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key)
}

/// Decode a token and return its [`Claims`].
///
/// Signature and expiry are checked by `jsonwebtoken` (with its default
/// 60-second leeway on `exp`).
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256)).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-signing-secret-0123456789".to_string(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn generate_and_validate_round_trip() {
        let config = test_config();
        let token = generate_access_token(42, &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();

        // Build an already-expired token, well past the 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_different_secret_fails() {
        let config_a = JwtConfig {
            secret: "first-signing-secret".to_string(),
            access_token_expiry_mins: 60,
        };
        let config_b = JwtConfig {
            secret: "second-signing-secret".to_string(),
            access_token_expiry_mins: 60,
        };

        let token = generate_access_token(1, &config_a).expect("token generation should succeed");

        assert!(validate_token(&token, &config_b).is_err());
    }
}
