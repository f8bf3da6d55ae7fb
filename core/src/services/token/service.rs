//! Main token service implementation

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error, warn};

use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationStore;

use super::config::TokenServiceConfig;

/// Service for issuing, validating and revoking JWTs
///
/// The revocation check lives only in [`TokenService::validate`]; every
/// caller that accepts a token goes through it.
pub struct TokenService<R: RevocationStore> {
    pub(crate) revocations: R,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: RevocationStore> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `revocations` - Revocation list consulted on every validation
    /// * `config` - Token service configuration
    pub fn new(revocations: R, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            revocations,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a signed token for `subject` that expires after `lifetime`
    ///
    /// Each call draws a fresh `jti`, so two tokens for the same subject
    /// issued within the same second still differ.
    pub fn issue(
        &self,
        subject: &str,
        lifetime: chrono::Duration,
        kind: TokenKind,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(subject, lifetime, kind).ok_or_else(|| {
            error!("Token lifetime of {}s overflows the expiry", lifetime.num_seconds());
            DomainError::Token(TokenError::TokenGenerationFailed)
        })?;
        self.encode_jwt(&claims)
    }

    /// Issues an access token with the configured default lifetime
    pub fn issue_access(&self, subject: &str) -> Result<String, DomainError> {
        self.issue(subject, self.access_lifetime()?, TokenKind::Access)
    }

    /// Issues a refresh token with the configured default lifetime
    pub fn issue_refresh(&self, subject: &str) -> Result<String, DomainError> {
        let lifetime = self.config.refresh_token_lifetime().ok_or_else(|| {
            error!(
                "Refresh token lifetime of {} days is out of range",
                self.config.refresh_token_expiry_days
            );
            DomainError::Token(TokenError::TokenGenerationFailed)
        })?;
        self.issue(subject, lifetime, TokenKind::Refresh)
    }

    /// Generates a new token pair (access + refresh tokens) for a subject
    pub fn generate_token_pair(&self, subject: &str) -> Result<TokenPair, DomainError> {
        let access_lifetime = self.access_lifetime()?;
        let access_token = self.issue(subject, access_lifetime, TokenKind::Access)?;
        let refresh_token = self.issue_refresh(subject)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            access_lifetime.num_seconds(),
        ))
    }

    fn access_lifetime(&self) -> Result<chrono::Duration, DomainError> {
        self.config.access_token_lifetime().ok_or_else(|| {
            error!(
                "Access token lifetime of {} minutes is out of range",
                self.config.access_token_expiry_minutes
            );
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!("Failed to sign token: {}", e);
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Checks signature, algorithm, expiry and `jti` presence, without the revocation lookup
    fn decode_claims(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!("Token rejected: {:?}", e.kind());
                DomainError::invalid_token()
            })?;

        match token_data.claims.jti.as_deref() {
            Some(jti) if !jti.is_empty() => Ok(token_data.claims),
            _ => {
                debug!("Token rejected: missing jti");
                Err(DomainError::invalid_token())
            }
        }
    }

    /// Validates a token and returns its claims
    ///
    /// Malformed, wrongly signed, wrongly algorithmed, expired, `jti`-less
    /// and revoked tokens all yield [`TokenError::InvalidOrExpired`]. If the
    /// revocation list cannot be reached the token is accepted and a warning
    /// is logged.
    pub async fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode_claims(token)?;
        let jti = claims.jti.as_deref().unwrap_or_default();

        match self.revocations.is_revoked(jti).await {
            Ok(true) => {
                debug!("Token rejected: jti {} is revoked", jti);
                Err(DomainError::invalid_token())
            }
            Ok(false) => Ok(claims),
            Err(e) => {
                warn!(
                    "Revocation list unavailable, accepting token {}: {}",
                    jti, e
                );
                Ok(claims)
            }
        }
    }

    /// Validates a token and returns its subject
    pub async fn validate_subject(&self, token: &str) -> Result<String, DomainError> {
        self.validate(token).await.map(|claims| claims.sub)
    }

    /// Revokes the token described by `claims` until its natural expiry
    ///
    /// Returns `true` if this call revoked the token and `false` if it was
    /// already revoked. Tokens that are already expired are left alone and
    /// also yield `false`: they can no longer validate, so there is nothing
    /// to record.
    pub async fn revoke(&self, claims: &Claims) -> Result<bool, DomainError> {
        let jti = match claims.jti.as_deref() {
            Some(jti) if !jti.is_empty() => jti,
            _ => return Err(DomainError::invalid_token()),
        };

        let Some(ttl) = self.remaining_lifetime(claims) else {
            debug!("Token {} already expired, nothing to revoke", jti);
            return Ok(false);
        };

        let created = self.revocations.revoke(jti, ttl).await.map_err(|e| {
            error!("Failed to revoke token {}: {}", jti, e);
            DomainError::Token(TokenError::RevocationFailed)
        })?;

        if created {
            debug!("Revoked token {} for {}s", jti, ttl.as_secs());
        }
        Ok(created)
    }

    /// Time for which a revocation entry must outlive this moment
    ///
    /// Validation accepts a token during the second named by `exp`, so the
    /// entry is kept one second past it. `None` once the token has expired.
    pub fn remaining_lifetime(&self, claims: &Claims) -> Option<Duration> {
        let remaining = claims.seconds_remaining_at(Utc::now().timestamp());
        if remaining < 0 {
            None
        } else {
            Some(Duration::from_secs(remaining as u64 + 1))
        }
    }
}
