//! Redis-backed store for pending OAuth states.

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use gk_core::domain::entities::oauth::OAuthProvider;
use gk_core::errors::DomainError;
use gk_core::repositories::oauth_state::{oauth_state_key, OAuthStateStore};

use super::redis_client::RedisClient;

/// OAuth state store keeping `oauth_state:<state>` = provider name
#[derive(Clone)]
pub struct RedisOAuthStateStore {
    client: RedisClient,
}

impl RedisOAuthStateStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OAuthStateStore for RedisOAuthStateStore {
    async fn save(
        &self,
        state: &str,
        provider: OAuthProvider,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.client
            .set_with_expiry(&oauth_state_key(state), provider.as_str(), ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    async fn consume(&self, state: &str) -> Result<Option<OAuthProvider>, DomainError> {
        let Some(stored) = self.client.take(&oauth_state_key(state)).await? else {
            return Ok(None);
        };

        match stored.parse::<OAuthProvider>() {
            Ok(provider) => Ok(Some(provider)),
            Err(_) => {
                warn!("Discarding OAuth state with unknown provider '{}'", stored);
                Ok(None)
            }
        }
    }
}
