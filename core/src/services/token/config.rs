//! Configuration for the token service

use std::str::FromStr;

use chrono::Duration;
use gk_shared::JwtConfig;
use jsonwebtoken::Algorithm;

use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 7,
        }
    }
}

impl TokenServiceConfig {
    /// Configuration with the given secret and default lifetimes
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Build from the shared JWT settings, rejecting non-HMAC algorithms
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            DomainError::Validation {
                message: format!("Unknown JWT algorithm '{}'", config.algorithm),
            }
        })?;

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::Validation {
                message: format!(
                    "JWT algorithm '{}' needs a key pair; only HS256, HS384 and HS512 are supported",
                    config.algorithm
                ),
            });
        }

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        })
    }

    /// `None` if the configured minutes do not fit a [`Duration`]
    pub fn access_token_lifetime(&self) -> Option<Duration> {
        Duration::try_minutes(self.access_token_expiry_minutes)
    }

    pub fn refresh_token_lifetime(&self) -> Option<Duration> {
        Duration::try_days(self.refresh_token_expiry_days)
    }
}
