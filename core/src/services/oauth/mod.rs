//! OAuth provider client port
//!
//! The concrete HTTP client lives in the infrastructure crate; the auth
//! service only needs to build authorization URLs and exchange codes.

use async_trait::async_trait;

use crate::domain::entities::oauth::{OAuthIdentity, OAuthProvider};
use crate::errors::DomainError;

#[cfg(any(test, feature = "test-utils"))]
mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockOAuthClient;

/// Client for the authorization-code flow of the supported providers
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Whether client credentials are configured for `provider`
    fn is_configured(&self, provider: OAuthProvider) -> bool;

    /// URL the user agent is redirected to, carrying `state`
    ///
    /// Fails with `ProviderNotConfigured` when the provider has no credentials.
    fn authorization_url(&self, provider: OAuthProvider, state: &str)
        -> Result<String, DomainError>;

    /// Exchange an authorization code for the user's identity
    ///
    /// Upstream failures (network, non-2xx, unparsable bodies) are reported
    /// as `AuthenticationFailed`.
    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<OAuthIdentity, DomainError>;
}
