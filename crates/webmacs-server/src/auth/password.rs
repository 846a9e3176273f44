//! Password hashing and verification using Argon2id.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::OsRng;
use webmacs_core::ErrorKind;

use super::TRACING_TARGET;

/// Argon2id password hasher with the crate-default cost parameters.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `password`, returning a PHC string suitable for storage in
    /// [`User::password_hash`](webmacs_data::model::User::password_hash).
    pub fn hash_password(&self, password: &str) -> webmacs_core::Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "salt generation failed");
            ErrorKind::DependencyFailure.with_context("password processing failed")
        })?;

        let hash = self.argon2.hash_password(password.as_bytes(), &salt).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "password hashing failed");
            ErrorKind::DependencyFailure.with_context("password processing failed")
        })?;

        Ok(hash.to_string())
    }

    /// Verifies `password` against `stored_hash`; an incorrect password
    /// and a malformed hash both become [`ErrorKind::Unauthorized`] so the
    /// caller can't distinguish the two at the HTTP boundary.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> webmacs_core::Result<()> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(target: TRACING_TARGET, error = %e, "stored password hash is malformed");
            ErrorKind::Unauthorized.with_context("invalid credentials")
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => Err(ErrorKind::Unauthorized.with_context("invalid credentials")),
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "password verification error");
                Err(ErrorKind::DependencyFailure.with_context("authentication temporarily unavailable"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct").unwrap();
        let err = hasher.verify_password("wrong", &hash).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn distinct_hashes_for_the_same_password() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash_password("same").unwrap();
        let b = hasher.hash_password("same").unwrap();
        assert_ne!(a, b);
    }
}
