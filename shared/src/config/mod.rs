//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing and OAuth provider credentials
//! - `cache` - Redis connection used by the revocation list
//! - `database` - Credential store connection pool
//! - `environment` - Environment detection
//! - `server` - HTTP server and CORS
//!
//! Every loader reads through a lookup closure so that the process
//! environment is only touched by [`AppConfig::from_env`].

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod server;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{JwtConfig, OAuthConfig, OAuthProviderConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::{CorsConfig, ServerConfig};

/// Errors raised while loading configuration at process start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    Missing { name: String },

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// OAuth provider credentials
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup)?;
        let server = ServerConfig::from_lookup(&lookup)?;
        let oauth = OAuthConfig::from_lookup(&lookup, &server.public_base_url)?;

        Ok(Self {
            environment,
            database: DatabaseConfig::from_lookup(&lookup)?,
            cache: CacheConfig::from_lookup(&lookup)?,
            jwt: JwtConfig::from_lookup(&lookup)?,
            cors: CorsConfig::from_lookup(&lookup),
            server,
            oauth,
        })
    }
}

/// Read the first non-empty variable among `names`
pub(crate) fn lookup_any<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Read a variable that must be present
pub(crate) fn required<F>(lookup: &F, names: &[&str]) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup_any(lookup, names).ok_or_else(|| ConfigError::Missing {
        name: names.first().copied().unwrap_or_default().to_string(),
    })
}

/// Parse an optional variable, falling back to `default` when unset
pub(crate) fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup_any(lookup, &[name]) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
