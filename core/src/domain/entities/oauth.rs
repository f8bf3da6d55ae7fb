//! OAuth provider identifiers and the identity a provider vouches for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{AuthError, DomainError};

/// Supported third-party identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    /// All providers, in a stable order
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::Google, OAuthProvider::Github];

    /// Path segment and storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "github" => Ok(OAuthProvider::Github),
            other => Err(DomainError::Auth(AuthError::UnknownProvider {
                provider: other.to_string(),
            })),
        }
    }
}

/// Identity returned by a provider after a successful code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub provider: OAuthProvider,

    /// Email address, if the provider disclosed one
    pub email: Option<String>,

    /// Display name, informational only
    pub name: Option<String>,
}

impl OAuthIdentity {
    pub fn new(provider: OAuthProvider, email: Option<String>) -> Self {
        Self {
            provider,
            email,
            name: None,
        }
    }
}
