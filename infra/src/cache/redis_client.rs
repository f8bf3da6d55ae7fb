//! Redis cache client implementation
//!
//! This module provides a Redis client with a lazily established multiplexed
//! connection that is replaced after it drops, retry logic, and the handful
//! of commands the revocation list and OAuth state store need.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use async_trait::async_trait;
use gk_core::errors::DomainError;
use gk_core::services::HealthProbe;
use gk_shared::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the exponential backoff between attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with lazy connection setup and retry logic
///
/// Cloning is cheap and all clones share one multiplexed connection. The
/// connection is opened on first use; a failed attempt is not remembered,
/// so the next command tries again. A command that fails with an I/O error
/// discards the shared connection and the next attempt reconnects.
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
    /// Multiplexed connection, `None` until connected or after it broke
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// Only the URL is checked here; no connection is made yet.
    ///
    /// # Example
    /// ```no_run
    /// use gk_infra::cache::RedisClient;
    /// use gk_shared::CacheConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = RedisClient::new(CacheConfig::new("redis://localhost:6379"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client for {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            config,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Shared connection, established on first call and after a reset
    async fn connection(&self) -> RedisResult<MultiplexedConnection> {
        if let Some(conn) = self.connection.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut slot = self.connection.write().await;
        // Another caller may have connected while we waited for the lock
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self.create_connection_with_retry().await?;
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Forget the shared connection so the next command reconnects
    async fn reset_connection(&self) {
        if self.connection.write().await.take().is_some() {
            warn!("Dropping broken Redis connection to {}", mask_url(&self.config.url));
        }
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(&self) -> RedisResult<MultiplexedConnection> {
        let max_retries = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match self.client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Connected to Redis at {}", mask_url(&self.config.url));
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Set a value with expiration time
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Value to store
    /// * `expiry_seconds` - Time to live in seconds, at least 1
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();

            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Set a value with expiration time unless the key already exists
    ///
    /// Runs `SET key value NX EX expiry_seconds`.
    ///
    /// # Returns
    /// * `Ok(true)` - The key was created
    /// * `Ok(false)` - The key already existed and was left unchanged
    pub async fn set_nx_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        debug!("Setting key '{}' if absent with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();

            Box::pin(async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("NX")
                    .arg("EX")
                    .arg(expiry_seconds)
                    .query_async::<_, Option<String>>(&mut conn)
                    .await
            })
        })
        .await
        .map(|reply| reply.is_some())
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value from cache
    ///
    /// # Returns
    /// * `Ok(None)` - Key not found or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Read and delete a key in one transaction
    ///
    /// Of two concurrent callers only one sees the value.
    pub async fn take(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Taking key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move {
                let (value, _deleted): (Option<String>, u32) = redis::pipe()
                    .atomic()
                    .get(&key)
                    .del(&key)
                    .query_async(&mut conn)
                    .await?;
                Ok(value)
            })
        })
        .await
        .map_err(|e| {
            error!("Failed to take key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key from cache
    ///
    /// # Returns
    /// * `Ok(true)` - Key was deleted
    /// * `Ok(false)` - Key did not exist
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move { conn.del::<_, u32>(key).await })
        })
        .await
        .map(|deleted| deleted > 0)
        .map_err(|e| {
            error!("Failed to delete key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if a key exists in cache
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Checking if key '{}' exists", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();

            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to check key '{}' existence: {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get time-to-live for a key
    ///
    /// # Returns
    /// * `Ok(None)` - Key doesn't exist or has no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let ttl = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();

                Box::pin(async move { conn.ttl::<_, i64>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to get TTL for key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok((ttl >= 0).then_some(ttl))
    }

    /// Execute a Redis operation with automatic retry logic
    ///
    /// Only transient errors are retried, with exponential backoff capped
    /// at five seconds. After an I/O error the connection is reset, so a
    /// retry (or the next command) runs on a fresh one.
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection().await?;

            let result = operation(conn).await;
            if let Err(e) = &result {
                if is_connection_error(e) {
                    self.reset_connection().await;
                }
            }

            match result {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }
}

#[async_trait]
impl HealthProbe for RedisClient {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> Result<(), DomainError> {
        match self.health_check().await? {
            true => Ok(()),
            false => Err(DomainError::internal("redis did not answer PING")),
        }
    }
}

/// Check if a Redis error is retriable
///
/// Determines if an error is transient and the operation should be retried.
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Whether the error means the connection itself is unusable
pub(crate) fn is_connection_error(error: &RedisError) -> bool {
    error.is_io_error() || error.is_connection_dropped()
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
