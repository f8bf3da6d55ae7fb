//! Revocation list interface.
//!
//! The revocation list remembers the `jti` of every logged-out token until
//! that token would have expired on its own. Entries carry their own TTL,
//! so no cleanup job is needed.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::DomainError;

/// Key prefix for revocation entries: `blacklist:<jti>`
pub const REVOCATION_KEY_PREFIX: &str = "blacklist:";

/// Storage for revoked token identifiers
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `jti` as revoked for `ttl`
    ///
    /// Returns `true` if this call created the entry. A live entry is left
    /// untouched and yields `false`, which makes revocation a one-time claim
    /// on the identifier.
    async fn revoke(&self, jti: &str, ttl: Duration) -> Result<bool, DomainError>;

    /// Whether `jti` is currently revoked
    ///
    /// Absence of an entry is the normal "not revoked" case, not an error.
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError>;
}

/// Storage key for a revoked token identifier
pub fn revocation_key(jti: &str) -> String {
    format!("{}{}", REVOCATION_KEY_PREFIX, jti)
}
