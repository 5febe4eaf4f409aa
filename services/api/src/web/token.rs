//! services/api/src/web/token.rs
//!
//! Signed, expiring bearer tokens (HS256 JWT). Expiry is the only way a token
//! stops being valid; there is no revocation list.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::web::middleware::AuthUser;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,        // User ID
    pub username: String, // Username at issue time
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Signs a token for the user, valid from now for the configured TTL.
    pub fn issue(&self, user_id: Uuid, username: &str) -> jsonwebtoken::errors::Result<String> {
        self.issue_at(user_id, username, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: Uuid,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            sub: user_id,
            username: username.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Checks signature and expiry and resolves the caller identity.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<AuthUser> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(AuthUser {
            id: data.claims.sub,
            username: data.claims.username,
        })
    }
}
