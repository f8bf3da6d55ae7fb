//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `gk_core`:
//!
//! - **Database**: MySQL user store using SQLx
//! - **Cache**: Redis client, revocation list and OAuth state store
//! - **OAuth**: HTTP client for the Google and GitHub authorization-code flow
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)

use gk_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and Redis-backed stores
pub mod cache;

/// OAuth module - provider HTTP client
pub mod oauth;

pub use cache::{RedisClient, RedisOAuthStateStore, RedisRevocationList};
#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlUserRepository};
pub use oauth::HttpOAuthClient;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// OAuth provider answered, but not with what the flow expects
    #[error("OAuth provider error: {0}")]
    OAuth(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}
