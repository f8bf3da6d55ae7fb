//! Business services containing domain logic and use cases.

pub mod auth;
pub mod health;
pub mod oauth;
pub mod password;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use health::HealthProbe;
pub use oauth::OAuthClient;
pub use password::PasswordHasher;
pub use token::{TokenService, TokenServiceConfig};

#[cfg(any(test, feature = "test-utils"))]
pub use oauth::MockOAuthClient;
