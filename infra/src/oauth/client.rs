//! HTTP client for the OAuth authorization-code flow.
//!
//! Every upstream failure is logged here with its detail and surfaces to the
//! domain as the generic `AuthenticationFailed`.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use gk_core::domain::entities::oauth::{OAuthIdentity, OAuthProvider};
use gk_core::errors::{AuthError, DomainError};
use gk_core::services::OAuthClient;
use gk_shared::{OAuthConfig, OAuthProviderConfig};

use crate::InfrastructureError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed endpoints of one provider
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProviderEndpoints {
    pub authorize: &'static str,
    pub token: &'static str,
    pub user: &'static str,
    pub scope: &'static str,
}

pub(crate) const GOOGLE: ProviderEndpoints = ProviderEndpoints {
    authorize: "https://accounts.google.com/o/oauth2/v2/auth",
    token: "https://oauth2.googleapis.com/token",
    user: "https://openidconnect.googleapis.com/v1/userinfo",
    scope: "openid email profile",
};

pub(crate) const GITHUB: ProviderEndpoints = ProviderEndpoints {
    authorize: "https://github.com/login/oauth/authorize",
    token: "https://github.com/login/oauth/access_token",
    user: "https://api.github.com/user",
    scope: "read:user user:email",
};

/// Address list for accounts whose profile hides the email
const GITHUB_EMAILS: &str = "https://api.github.com/user/emails";

pub(crate) fn endpoints(provider: OAuthProvider) -> &'static ProviderEndpoints {
    match provider {
        OAuthProvider::Google => &GOOGLE,
        OAuthProvider::Github => &GITHUB,
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    /// GitHub reports failures with a 200 and this field
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GithubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

/// Pick the address GitHub marks as primary, provided it is verified
pub(crate) fn select_github_email(emails: &[GithubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email.clone())
}

/// OAuth client talking to the real provider endpoints
pub struct HttpOAuthClient {
    http: Client,
    google: Option<OAuthProviderConfig>,
    github: Option<OAuthProviderConfig>,
}

impl HttpOAuthClient {
    pub fn new(config: &OAuthConfig) -> Result<Self, InfrastructureError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            // GitHub's API refuses requests without a user agent
            .user_agent(concat!("gatekeep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            google: config.google.clone(),
            github: config.github.clone(),
        })
    }

    fn provider_config(&self, provider: OAuthProvider) -> Option<&OAuthProviderConfig> {
        match provider {
            OAuthProvider::Google => self.google.as_ref(),
            OAuthProvider::Github => self.github.as_ref(),
        }
    }

    fn require_config(&self, provider: OAuthProvider) -> Result<&OAuthProviderConfig, DomainError> {
        self.provider_config(provider).ok_or_else(|| {
            AuthError::ProviderNotConfigured {
                provider: provider.to_string(),
            }
            .into()
        })
    }

    async fn fetch_access_token(
        &self,
        provider: OAuthProvider,
        config: &OAuthProviderConfig,
        code: &str,
    ) -> Result<String, InfrastructureError> {
        let response: TokenResponse = self
            .http
            .post(endpoints(provider).token)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", config.redirect_uri.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (response.access_token, response.error) {
            (Some(token), _) if !token.is_empty() => Ok(token),
            (_, Some(error)) => Err(InfrastructureError::OAuth(format!(
                "token endpoint returned '{}'",
                error
            ))),
            _ => Err(InfrastructureError::OAuth(
                "token endpoint returned no access token".to_string(),
            )),
        }
    }

    async fn fetch_identity(
        &self,
        provider: OAuthProvider,
        config: &OAuthProviderConfig,
        code: &str,
    ) -> Result<OAuthIdentity, InfrastructureError> {
        let access_token = self.fetch_access_token(provider, config, code).await?;
        match provider {
            OAuthProvider::Google => self.google_identity(&access_token).await,
            OAuthProvider::Github => self.github_identity(&access_token).await,
        }
    }

    async fn google_identity(&self, access_token: &str) -> Result<OAuthIdentity, InfrastructureError> {
        let info: GoogleUserInfo = self
            .http
            .get(GOOGLE.user)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // An address Google has not verified does not identify anyone
        let email = info.email.filter(|_| info.email_verified != Some(false));

        Ok(OAuthIdentity {
            provider: OAuthProvider::Google,
            email,
            name: info.name,
        })
    }

    async fn github_identity(&self, access_token: &str) -> Result<OAuthIdentity, InfrastructureError> {
        let user: GithubUser = self
            .http
            .get(GITHUB.user)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let email = match user.email.filter(|e| !e.is_empty()) {
            Some(email) => Some(email),
            None => {
                debug!("GitHub user {} has no public email, listing addresses", user.login);
                let emails: Vec<GithubEmail> = self
                    .http
                    .get(GITHUB_EMAILS)
                    .bearer_auth(access_token)
                    .header(header::ACCEPT, "application/vnd.github+json")
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                select_github_email(&emails)
            }
        };

        Ok(OAuthIdentity {
            provider: OAuthProvider::Github,
            email,
            name: user.name.or(Some(user.login)),
        })
    }
}

#[async_trait]
impl OAuthClient for HttpOAuthClient {
    fn is_configured(&self, provider: OAuthProvider) -> bool {
        self.provider_config(provider).is_some()
    }

    fn authorization_url(
        &self,
        provider: OAuthProvider,
        state: &str,
    ) -> Result<String, DomainError> {
        let config = self.require_config(provider)?;
        let endpoints = endpoints(provider);

        let mut url = Url::parse(endpoints.authorize).map_err(DomainError::internal)?;
        url.query_pairs_mut()
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", endpoints.scope)
            .append_pair("state", state);

        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<OAuthIdentity, DomainError> {
        let config = self.require_config(provider)?;

        self.fetch_identity(provider, config, code)
            .await
            .map_err(|e| {
                warn!("OAuth exchange with {} failed: {}", provider, e);
                AuthError::AuthenticationFailed.into()
            })
    }
}
