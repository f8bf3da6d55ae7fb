//! Middleware for the Gatekeep API

pub mod auth;
pub mod cors;

pub use auth::{AuthContext, JwtAuth, TokenValidator};
pub use cors::create_cors;
