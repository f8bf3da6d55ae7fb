//! Storage for OAuth `state` values.
//!
//! A state is created when the authorization redirect is issued and must be
//! consumed exactly once by the matching callback.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::oauth::OAuthProvider;
use crate::errors::DomainError;

/// Key prefix for pending states: `oauth_state:<state>`
pub const OAUTH_STATE_KEY_PREFIX: &str = "oauth_state:";

#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    /// Remember `state` as issued for `provider`, for at most `ttl`
    async fn save(
        &self,
        state: &str,
        provider: OAuthProvider,
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Remove `state` and return the provider it was issued for
    ///
    /// Returns `Ok(None)` for unknown, expired or already consumed states.
    async fn consume(&self, state: &str) -> Result<Option<OAuthProvider>, DomainError>;
}

/// Storage key for a pending OAuth state
pub fn oauth_state_key(state: &str) -> String {
    format!("{}{}", OAUTH_STATE_KEY_PREFIX, state)
}
