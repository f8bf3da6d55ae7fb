//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::{lookup_any, parse_or, ConfigError};

/// Redis configuration for the revocation list and OAuth state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Attempts per command before giving up on a transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Load from `REDIS_URL`, `REDIS_MAX_RETRIES` and `REDIS_RETRY_DELAY_MS`
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            url: lookup_any(lookup, &["REDIS_URL"])
                .unwrap_or_else(|| String::from("redis://localhost:6379")),
            max_retries: parse_or(lookup, "REDIS_MAX_RETRIES", default_max_retries())?,
            retry_delay_ms: parse_or(lookup, "REDIS_RETRY_DELAY_MS", default_retry_delay_ms())?,
        })
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay_ms, 100);
    }

    #[test]
    fn test_cache_config_from_lookup() {
        let lookup = |name: &str| match name {
            "REDIS_URL" => Some("redis://cache:6379/2".to_string()),
            "REDIS_MAX_RETRIES" => Some("5".to_string()),
            _ => None,
        };
        let config = CacheConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.url, "redis://cache:6379/2");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_ms, 100);
    }
}
