//! Authentication service module
//!
//! This module orchestrates the login flows on top of the token service:
//! - Registration and password login
//! - OAuth login with single-use state
//! - Refresh token rotation
//! - Logout through the revocation list

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
