//! Token entities for JWT-based authentication.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of `token_type` in every token response
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Purpose of a token, carried in the `token_type` claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on API calls
    #[default]
    Access,
    /// Long-lived token exchanged at `/auth/refresh`
    Refresh,
}

/// Claims structure for JWT payload
///
/// The shape is fixed; there is no free-form extension map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID, the revocation key. Tokens decoded without one are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Access or refresh; tokens without the claim decode as access tokens
    #[serde(default)]
    pub token_type: TokenKind,
}

impl Claims {
    /// Creates claims issued now, valid for `lifetime`, with a fresh `jti`
    ///
    /// `None` when the expiry falls outside the representable date range.
    pub fn new(subject: impl Into<String>, lifetime: Duration, kind: TokenKind) -> Option<Self> {
        let now = Utc::now();
        let exp = now.checked_add_signed(lifetime)?;
        Some(Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
            token_type: kind,
        })
    }

    /// Seconds left until `exp` as seen at `now`; negative once expired
    pub fn seconds_remaining_at(&self, now: i64) -> i64 {
        self.exp - now
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenKind::Refresh
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Always `bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        }
    }
}
