//! Password hashing with bcrypt
//!
//! Hashing and verification run on the blocking thread pool. The
//! comparison itself is the constant-time check inside `bcrypt::verify`.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{error, warn};

use crate::errors::DomainError;

/// Password fed to the dummy verification for accounts that do not exist
const DUMMY_PASSWORD: &str = "gatekeep-dummy-password";

/// Bcrypt password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash verified against when there is no real one, so a missing
    /// account costs as much time as a wrong password
    dummy_hash: Arc<OnceCell<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// Creates a hasher using the given bcrypt cost (4..=31)
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a password for storage
    pub async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                DomainError::internal("password hashing task failed")
            })?
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                DomainError::internal("password hashing failed")
            })
    }

    /// Verifies a password against a stored hash
    ///
    /// With `hash == None` (unknown user or password-less account) a dummy
    /// verification still runs and the result is always `false`. A stored
    /// hash that bcrypt cannot parse also counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: Option<&str>) -> Result<bool, DomainError> {
        let password = password.to_owned();
        let hash = hash.map(str::to_owned);
        let dummy_hash = Arc::clone(&self.dummy_hash);
        let cost = self.cost;

        let outcome = tokio::task::spawn_blocking(move || match hash {
            Some(hash) => bcrypt::verify(&password, &hash),
            None => {
                let dummy = dummy_hash.get_or_try_init(|| bcrypt::hash(DUMMY_PASSWORD, cost))?;
                bcrypt::verify(&password, dummy).map(|_| false)
            }
        })
        .await
        .map_err(|e| {
            error!("Password verification task failed: {}", e);
            DomainError::internal("password verification task failed")
        })?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!("Stored password hash could not be verified: {}", e);
                Ok(false)
            }
        }
    }
}
