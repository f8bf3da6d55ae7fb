//! User entity representing an account in the credential store.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest username accepted at registration
pub const USERNAME_MAX_LENGTH: usize = 32;

/// Characters stripped when deriving a username from an email address
static USERNAME_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_.\-]").expect("static regex is valid"));

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user, also the token subject
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Unique email address, stored lower-cased
    pub email: String,

    /// Bcrypt hash; `None` for accounts created through OAuth
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(username: impl Into<String>, email: &str, password_hash: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: Self::normalize_email(email),
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Canonical form used for storage and lookups
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Whether this account can pass password login at all
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Token subject for this user
    pub fn subject(&self) -> String {
        self.id.to_string()
    }

    /// Derives a username candidate from the local part of an email address
    ///
    /// A `+tag` sub-address is dropped. The result only contains
    /// `[a-z0-9_.-]`, falls back to `user` when nothing survives, and leaves
    /// room for a 7 character collision suffix.
    pub fn username_from_email(email: &str) -> String {
        let email = Self::normalize_email(email);
        let local = email.split('@').next().unwrap_or_default();
        let local = local.split('+').next().unwrap_or_default();
        let cleaned = USERNAME_DISALLOWED.replace_all(local, "");
        let mut base: String = cleaned.chars().take(USERNAME_MAX_LENGTH - 7).collect();
        if base.is_empty() {
            base.push_str("user");
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("alice", "  Alice@Example.COM ", Some("hash".to_string()));

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(user.has_password());
        assert_eq!(user.subject(), user.id.to_string());
    }

    #[test]
    fn test_oauth_user_has_no_password() {
        let user = User::new("bob", "bob@example.com", None);
        assert!(!user.has_password());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("carol", "carol@example.com", Some("secret-hash".to_string()));
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_username_from_email() {
        assert_eq!(User::username_from_email("John.Doe+tag@gmail.com"), "john.doe");
        assert_eq!(User::username_from_email("a_b-c@x.io"), "a_b-c");
        assert_eq!(User::username_from_email("+++@example.com"), "user");
        assert_eq!(User::username_from_email("dev+a+b@example.com"), "dev");
        assert_eq!(User::username_from_email("no-at-sign"), "no-at-sign");

        let long = format!("{}@example.com", "x".repeat(60));
        assert_eq!(User::username_from_email(&long).len(), USERNAME_MAX_LENGTH - 7);
    }
}
