//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Authentication response containing tokens and the authenticated user
///
/// Returned by register, password login, OAuth callback and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining new token pairs
    pub refresh_token: String,

    /// Always `bearer`
    pub token_type: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// The account the tokens were issued for
    pub user: UserProfile,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and user
    pub fn from_token_pair(token_pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            token_type: token_pair.token_type,
            expires_in: token_pair.expires_in,
            user: UserProfile::from(user),
        }
    }
}
