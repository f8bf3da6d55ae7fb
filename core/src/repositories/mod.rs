pub mod oauth_state;
pub mod revocation;
pub mod user;

pub use oauth_state::OAuthStateStore;
pub use revocation::RevocationStore;
pub use user::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
pub use oauth_state::MockOAuthStateStore;
#[cfg(any(test, feature = "test-utils"))]
pub use revocation::MockRevocationStore;
#[cfg(any(test, feature = "test-utils"))]
pub use user::MockUserRepository;
