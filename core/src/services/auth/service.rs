//! Main authentication service implementation

use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::oauth::OAuthProvider;
use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;
use crate::domain::value_objects::{AuthResponse, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use crate::services::oauth::OAuthClient;
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Authentication service for password and OAuth login flows
pub struct AuthService<U, R, O, S>
where
    U: UserRepository,
    R: RevocationStore,
    O: OAuthClient,
    S: OAuthStateStore,
{
    /// User repository for account persistence
    user_repository: Arc<U>,
    /// Token service for JWT management
    token_service: Arc<TokenService<R>>,
    /// Client for the OAuth providers
    oauth_client: Arc<O>,
    /// Pending OAuth states
    state_store: Arc<S>,
    password_hasher: PasswordHasher,
    config: AuthServiceConfig,
}

impl<U, R, O, S> AuthService<U, R, O, S>
where
    U: UserRepository,
    R: RevocationStore,
    O: OAuthClient,
    S: OAuthStateStore,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_service` - Service for JWT token management
    /// * `oauth_client` - Client for the configured OAuth providers
    /// * `state_store` - Storage for pending OAuth states
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<R>>,
        oauth_client: Arc<O>,
        state_store: Arc<S>,
        config: AuthServiceConfig,
    ) -> Self {
        let password_hasher = PasswordHasher::new(config.bcrypt_cost);
        Self {
            user_repository,
            token_service,
            oauth_client,
            state_store,
            password_hasher,
            config,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<R>> {
        &self.token_service
    }

    /// Register a new account with a password
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Token pair for the new account
    /// * `Err(AuthError::UserAlreadyExists)` - Username or email already taken
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthResponse> {
        let email = User::normalize_email(email);

        if self.user_repository.exists_by_username(username).await?
            || self.user_repository.exists_by_email(&email).await?
        {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = self.password_hasher.hash(password).await?;
        let user = self
            .user_repository
            .create(User::new(username, &email, Some(password_hash)))
            .await?;

        info!("Registered user {}", user.id);
        self.issue_for(&user)
    }

    /// Authenticate with a username or email and a password
    ///
    /// An unknown account, an account without a password and a wrong
    /// password all produce the same [`AuthError::InvalidCredentials`], and
    /// all of them pay for one bcrypt verification. Storage failures are
    /// returned as they are, so login fails closed.
    pub async fn login(&self, login: &str, password: &str) -> DomainResult<AuthResponse> {
        let login = login.trim();
        let user = if login.contains('@') {
            self.user_repository
                .find_by_email(&User::normalize_email(login))
                .await?
        } else {
            self.user_repository.find_by_username(login).await?
        };

        let stored_hash = user.as_ref().and_then(|u| u.password_hash.as_deref());
        let verified = self.password_hasher.verify(password, stored_hash).await?;

        match user {
            Some(user) if verified => {
                debug!("Password login succeeded for {}", user.id);
                self.issue_for(&user)
            }
            Some(user) if !user.has_password() => {
                debug!("Password login rejected: {} has no password set", user.id);
                Err(AuthError::InvalidCredentials.into())
            }
            _ => {
                debug!("Password login rejected");
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    /// Start an OAuth login and return the provider URL to redirect to
    ///
    /// A fresh `state` is stored for the configured TTL and must come back
    /// on the callback.
    pub async fn begin_oauth(&self, provider: OAuthProvider) -> DomainResult<String> {
        if !self.oauth_client.is_configured(provider) {
            return Err(AuthError::ProviderNotConfigured {
                provider: provider.to_string(),
            }
            .into());
        }

        let state = generate_state();
        self.state_store
            .save(&state, provider, self.config.oauth_state_ttl)
            .await?;

        self.oauth_client.authorization_url(provider, &state)
    }

    /// Finish an OAuth login from the provider callback
    ///
    /// The state is consumed before anything else, so a replayed callback
    /// fails even if the code exchange would still work.
    pub async fn complete_oauth(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> DomainResult<AuthResponse> {
        match self.state_store.consume(state).await? {
            Some(issued_for) if issued_for == provider => {}
            Some(issued_for) => {
                warn!(
                    "OAuth state issued for {} presented to {} callback",
                    issued_for, provider
                );
                return Err(AuthError::InvalidOAuthState.into());
            }
            None => return Err(AuthError::InvalidOAuthState.into()),
        }

        let identity = self.oauth_client.exchange_code(provider, code).await?;
        let email = identity
            .email
            .as_deref()
            .map(User::normalize_email)
            .filter(|email| !email.is_empty())
            .ok_or(AuthError::OAuthEmailMissing)?;

        let user = self.find_or_create_oauth_user(&email).await?;
        debug!("OAuth login via {} for {}", provider, user.id);
        self.issue_for(&user)
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The presented refresh token is revoked, so each one works once. The
    /// revocation entry is created atomically, so of two concurrent
    /// exchanges of the same token only one succeeds.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthResponse> {
        let claims = self.token_service.validate(refresh_token).await?;
        if !claims.is_refresh() {
            debug!("Refresh rejected: not a refresh token");
            return Err(DomainError::invalid_token());
        }

        let user = self.user_for_claims(&claims).await?;
        // Only the caller that revokes the old token gets a new pair
        if !self.token_service.revoke(&claims).await? {
            debug!("Refresh rejected: token was already used");
            return Err(DomainError::invalid_token());
        }
        self.issue_for(&user)
    }

    /// Revoke the presented access token and, optionally, a refresh token
    ///
    /// A refresh token that does not validate or belongs to someone else
    /// is ignored; the access token is revoked either way.
    pub async fn logout(&self, claims: &Claims, refresh_token: Option<&str>) -> DomainResult<()> {
        self.token_service.revoke(claims).await?;

        if let Some(token) = refresh_token {
            match self.token_service.validate(token).await {
                Ok(refresh) if refresh.is_refresh() && refresh.sub == claims.sub => {
                    self.token_service.revoke(&refresh).await?;
                }
                Ok(_) => debug!("Logout: refresh token does not match session, ignored"),
                Err(_) => debug!("Logout: refresh token already invalid"),
            }
        }

        info!("User {} logged out", claims.sub);
        Ok(())
    }

    /// Profile of the account a validated token belongs to
    pub async fn me(&self, claims: &Claims) -> DomainResult<UserProfile> {
        let user = self.user_for_claims(claims).await?;
        Ok(UserProfile::from(&user))
    }

    fn issue_for(&self, user: &User) -> DomainResult<AuthResponse> {
        let pair = self.token_service.generate_token_pair(&user.subject())?;
        Ok(AuthResponse::from_token_pair(pair, user))
    }

    /// Resolve a token subject to an existing account
    ///
    /// Tokens whose subject is not an account id, or whose account is gone,
    /// are treated as invalid tokens.
    async fn user_for_claims(&self, claims: &Claims) -> DomainResult<User> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::invalid_token())?;
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(DomainError::invalid_token)
    }

    async fn find_or_create_oauth_user(&self, email: &str) -> DomainResult<User> {
        if let Some(user) = self.user_repository.find_by_email(email).await? {
            return Ok(user);
        }

        let base = User::username_from_email(email);
        for attempt in 0..self.config.username_attempts {
            let username = if attempt == 0 {
                base.clone()
            } else {
                format!("{}_{}", base, random_hex(3))
            };

            if self.user_repository.exists_by_username(&username).await? {
                continue;
            }

            match self
                .user_repository
                .create(User::new(username, email, None))
                .await
            {
                Ok(user) => {
                    info!("Created user {} from OAuth login", user.id);
                    return Ok(user);
                }
                Err(DomainError::Auth(AuthError::UserAlreadyExists)) => {
                    // Lost a race: either the email or the username was taken meanwhile
                    if let Some(user) = self.user_repository.find_by_email(email).await? {
                        return Ok(user);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::internal(format!(
            "no free username derived from '{}' after {} attempts",
            base, self.config.username_attempts
        )))
    }
}

/// Unguessable OAuth state value
fn generate_state() -> String {
    random_hex(32)
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}
