//! User repository trait defining the interface for the credential store.
//!
//! The trait is async-first and uses Result types for proper error handling.
//! Implementations report storage failures as [`DomainError::Internal`] and
//! uniqueness violations as [`AuthError::UserAlreadyExists`].
//!
//! [`AuthError::UserAlreadyExists`]: crate::errors::AuthError::UserAlreadyExists

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use gk_core::repositories::UserRepository;
/// use gk_core::domain::entities::user::User;
/// use gk_core::errors::DomainError;
///
/// struct InMemoryUsers;
///
/// #[async_trait]
/// impl UserRepository for InMemoryUsers {
///     async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///     async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///     async fn find_by_username(&self, _username: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///     async fn create(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email; `email` is expected in normalized form
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username (exact match)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Username or email taken
    /// * `Err(DomainError)` - Creation failed
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Check whether a username is taken
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Check whether an email is taken
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
