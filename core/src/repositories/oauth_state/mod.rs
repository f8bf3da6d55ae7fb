pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::{oauth_state_key, OAuthStateStore, OAUTH_STATE_KEY_PREFIX};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockOAuthStateStore;

#[cfg(test)]
mod tests;
