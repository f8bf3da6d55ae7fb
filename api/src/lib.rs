//! # Gatekeep API
//!
//! actix-web surface of the auth backend: the `/auth` endpoints, the JWT
//! middleware and the health checks. Library exports exist so the binary
//! and the integration tests build the same application.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use routes::auth::AppState;
