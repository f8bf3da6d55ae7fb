//! Domain-specific error types for authentication and token operations
//!
//! Messages are deliberately generic: the presentation layer forwards them
//! to clients, so they must never reveal whether an account exists or why
//! exactly a token was refused.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user, wrong password, or an account without a password
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// The OAuth provider rejected the exchange or could not be reached
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("OAuth provider did not return an email address")]
    OAuthEmailMissing,

    #[error("Invalid or expired OAuth state")]
    InvalidOAuthState,

    #[error("OAuth provider '{provider}' is not configured")]
    ProviderNotConfigured { provider: String },

    #[error("Unknown OAuth provider '{provider}'")]
    UnknownProvider { provider: String },

    #[error("User already exists")]
    UserAlreadyExists,
}

/// Token-related errors
///
/// Every validation failure (malformed, bad signature, wrong algorithm,
/// expired, missing `jti`, revoked) collapses into [`TokenError::InvalidOrExpired`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Could not validate credentials")]
    InvalidOrExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Token revocation failed")]
    RevocationFailed,
}
