//! Mock implementation of OAuthClient for testing

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::oauth::{OAuthIdentity, OAuthProvider};
use crate::errors::{AuthError, DomainError};

use super::OAuthClient;

/// Mock OAuth client that knows a fixed set of authorization codes
#[derive(Clone, Default)]
pub struct MockOAuthClient {
    configured: Arc<HashSet<OAuthProvider>>,
    identities: Arc<RwLock<HashMap<(OAuthProvider, String), OAuthIdentity>>>,
}

impl MockOAuthClient {
    /// Client with every provider configured
    pub fn new() -> Self {
        Self::with_providers(&OAuthProvider::ALL)
    }

    /// Client with only the given providers configured
    pub fn with_providers(providers: &[OAuthProvider]) -> Self {
        Self {
            configured: Arc::new(providers.iter().copied().collect()),
            identities: Arc::default(),
        }
    }

    /// Make `code` exchange to `identity` for its provider
    pub async fn register_code(&self, code: &str, identity: OAuthIdentity) {
        let mut identities = self.identities.write().await;
        identities.insert((identity.provider, code.to_string()), identity);
    }
}

#[async_trait]
impl OAuthClient for MockOAuthClient {
    fn is_configured(&self, provider: OAuthProvider) -> bool {
        self.configured.contains(&provider)
    }

    fn authorization_url(
        &self,
        provider: OAuthProvider,
        state: &str,
    ) -> Result<String, DomainError> {
        if !self.is_configured(provider) {
            return Err(AuthError::ProviderNotConfigured {
                provider: provider.to_string(),
            }
            .into());
        }
        Ok(format!(
            "https://{}.example.test/authorize?client_id=mock&state={}",
            provider, state
        ))
    }

    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<OAuthIdentity, DomainError> {
        let identities = self.identities.read().await;
        identities
            .get(&(provider, code.to_string()))
            .cloned()
            .ok_or_else(|| AuthError::AuthenticationFailed.into())
    }
}
