//! Shared configuration and common types for the Gatekeep server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types and environment loading
//! - The error response body returned by every endpoint

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    OAuthConfig, OAuthProviderConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
