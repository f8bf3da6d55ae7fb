//! Domain entities representing core business objects.

pub mod oauth;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use oauth::{OAuthIdentity, OAuthProvider};
pub use token::{Claims, TokenKind, TokenPair, TOKEN_TYPE_BEARER};
pub use user::{User, USERNAME_MAX_LENGTH};
