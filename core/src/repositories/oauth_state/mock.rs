//! Mock implementation of OAuthStateStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::entities::oauth::OAuthProvider;
use crate::errors::DomainError;

use super::trait_::{oauth_state_key, OAuthStateStore};

/// Mock OAuth state store with TTL expiry
#[derive(Clone, Default)]
pub struct MockOAuthStateStore {
    states: Arc<RwLock<HashMap<String, (OAuthProvider, Instant)>>>,
}

impl MockOAuthStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// States issued and not yet consumed, in no particular order
    pub async fn pending_states(&self) -> Vec<String> {
        let states = self.states.read().await;
        states
            .keys()
            .filter_map(|key| key.strip_prefix(super::OAUTH_STATE_KEY_PREFIX))
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl OAuthStateStore for MockOAuthStateStore {
    async fn save(
        &self,
        state: &str,
        provider: OAuthProvider,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut states = self.states.write().await;
        states.insert(oauth_state_key(state), (provider, Instant::now() + ttl));
        Ok(())
    }

    async fn consume(&self, state: &str) -> Result<Option<OAuthProvider>, DomainError> {
        let mut states = self.states.write().await;
        Ok(states
            .remove(&oauth_state_key(state))
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(provider, _)| provider))
    }
}
