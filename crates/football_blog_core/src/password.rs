//! crates/football_blog_core/src/password.rs
//!
//! One-way password digests. A digest can only be produced by hashing a
//! plaintext with a fresh salt, or by loading an already-hashed PHC string
//! back from storage.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;

use crate::ports::{PortError, PortResult};

/// A salted argon2 digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hashes `plaintext` with a freshly generated salt.
    pub fn hash(plaintext: &str) -> PortResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {e}")))?
            .to_string();
        Ok(Self(digest))
    }

    /// Wraps a PHC string that was previously produced by [`PasswordDigest::hash`].
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Checks a candidate password against the digest.
    ///
    /// A digest that cannot be parsed never verifies.
    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}
