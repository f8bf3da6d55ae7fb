//! Configuration for the authentication service

use std::time::Duration;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// How long an issued OAuth `state` stays redeemable
    pub oauth_state_ttl: Duration,
    /// Bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Attempts at finding a free username for a new OAuth account
    pub username_attempts: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            oauth_state_ttl: Duration::from_secs(600),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            username_attempts: 5,
        }
    }
}

impl AuthServiceConfig {
    /// Set the bcrypt cost
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}
