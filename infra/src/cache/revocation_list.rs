//! Redis-backed revocation list.
//!
//! Each revoked token is stored as `blacklist:<jti>` = `revoked` with a TTL
//! equal to the token's remaining lifetime, so entries disappear on their
//! own once the token could no longer validate anyway. Entries are written
//! with `SET NX`, so only one revocation of a given token ever succeeds.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use gk_core::errors::DomainError;
use gk_core::repositories::revocation::{revocation_key, RevocationStore};

use super::redis_client::RedisClient;

/// Value stored under every revocation key
pub const REVOKED_MARKER: &str = "revoked";

/// Revocation list stored in Redis
#[derive(Clone)]
pub struct RedisRevocationList {
    client: RedisClient,
}

impl RedisRevocationList {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationList {
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<bool, DomainError> {
        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);
        let created = self
            .client
            .set_nx_with_expiry(&revocation_key(jti), REVOKED_MARKER, seconds)
            .await?;
        if created {
            debug!("Revocation entry for {} expires in {}s", jti, seconds);
        } else {
            debug!("Token {} was already revoked", jti);
        }
        Ok(created)
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
        Ok(self.client.exists(&revocation_key(jti)).await?)
    }
}
