//! Password hashing adapter (bcrypt).
//!
//! - `hash` produces a salted bcrypt string for storage.
//! - `check` never errors: a corrupt stored hash is a failed check.
//! - `check_dummy` burns the same work as a real check so that login
//!   takes similar time whether or not the account exists.
//!
//! bcrypt is CPU-bound; async callers should go through the `*_blocking`
//! helpers, which move the work onto the blocking pool.
use std::fmt;
use std::sync::Arc;

use bcrypt::DEFAULT_COST;
use thiserror::Error;
use tracing::warn;

/// Default bcrypt cost factor.
pub const BCRYPT_COST: u32 = DEFAULT_COST;

/// bcrypt only looks at the first 72 bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let dummy_hash = bcrypt::hash("dummy-password-for-timing", cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    pub fn check(&self, plaintext: &str, stored_hash: &str) -> bool {
        match bcrypt::verify(plaintext, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "stored password hash could not be verified");
                false
            }
        }
    }

    /// Always `false`.
    pub fn check_dummy(&self, plaintext: &str) -> bool {
        let _ = bcrypt::verify(plaintext, &self.dummy_hash);
        false
    }

    pub async fn hash_blocking(
        self: &Arc<Self>,
        plaintext: String,
    ) -> Result<String, PasswordError> {
        let hasher = Arc::clone(self);
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    /// `stored_hash = None` runs the dummy check.
    pub async fn check_blocking(
        self: &Arc<Self>,
        plaintext: String,
        stored_hash: Option<String>,
    ) -> bool {
        let hasher = Arc::clone(self);
        let outcome = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.check(&plaintext, &hash),
            None => hasher.check_dummy(&plaintext),
        })
        .await;

        match outcome {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "password check task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps tests fast.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn hash_then_check() {
        let hasher = hasher();
        let stored = hasher.hash("correct horse").unwrap();

        assert!(stored.starts_with("$2"));
        assert!(!stored.contains("correct horse"));
        assert!(hasher.check("correct horse", &stored));
        assert!(!hasher.check("Correct horse", &stored));
        assert!(!hasher.check("", &stored));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = hasher();
        let a = hasher.hash("pw").unwrap();
        let b = hasher.hash("pw").unwrap();
        assert_ne!(a, b);
        assert!(hasher.check("pw", &a));
        assert!(hasher.check("pw", &b));
    }

    #[test]
    fn corrupt_stored_hash_fails_closed() {
        let hasher = hasher();
        assert!(!hasher.check("pw", "not-a-bcrypt-hash"));
        assert!(!hasher.check("pw", ""));
    }

    #[test]
    fn dummy_check_never_matches() {
        let hasher = hasher();
        assert!(!hasher.check_dummy("dummy-password-for-timing"));
    }

    #[tokio::test]
    async fn blocking_helpers_round_trip() {
        let hasher = Arc::new(hasher());
        let stored = hasher.hash_blocking("pw".to_string()).await.unwrap();

        assert!(hasher.check_blocking("pw".to_string(), Some(stored.clone())).await);
        assert!(!hasher.check_blocking("nope".to_string(), Some(stored)).await);
        assert!(!hasher.check_blocking("pw".to_string(), None).await);
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(PasswordHasher::new(1).is_err());
    }
}
