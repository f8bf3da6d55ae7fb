//! Cache module for Redis-backed storage
//!
//! This module provides the Redis client with retry logic and the two
//! Redis-backed stores built on it: the token revocation list and the
//! pending OAuth state store.

pub mod oauth_state;
pub mod redis_client;
pub mod revocation_list;

#[cfg(test)]
mod tests;

pub use oauth_state::RedisOAuthStateStore;
pub use redis_client::RedisClient;
pub use revocation_list::RedisRevocationList;

// Re-export commonly used types
pub use gk_shared::CacheConfig;
