//! In-memory revocation list with TTL expiry, for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::DomainError;

use super::trait_::{revocation_key, RevocationStore};

/// Mock revocation store
///
/// Entries expire like Redis keys would. Expiry is measured with
/// `tokio::time::Instant`, so paused-clock tests can advance it.
#[derive(Clone, Default)]
pub struct MockRevocationStore {
    entries: Arc<RwLock<HashMap<String, Instant>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if Redis were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Remaining TTL of a live entry
    pub async fn ttl(&self, jti: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries
            .get(&revocation_key(jti))
            .and_then(|deadline| deadline.checked_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Number of live entries
    pub async fn active_entries(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|deadline| **deadline > now).count()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "revocation store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for MockRevocationStore {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<bool, DomainError> {
        self.check_available()?;
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let key = revocation_key(jti);
        if entries.get(&key).is_some_and(|deadline| *deadline > now) {
            return Ok(false);
        }
        entries.insert(key, now + ttl);
        Ok(true)
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        Ok(entries
            .get(&revocation_key(jti))
            .map(|deadline| *deadline > Instant::now())
            .unwrap_or(false))
    }
}
