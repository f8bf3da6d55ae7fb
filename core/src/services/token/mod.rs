//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT access and refresh token issuance
//! - Validation with revocation list lookup
//! - Revocation for the remaining token lifetime

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
