//! Authentication route handlers
//!
//! Password login and registration, the OAuth redirect and callback, token
//! refresh, logout and the current-user lookup.

pub mod login;
pub mod logout;
pub mod me;
pub mod oauth;
pub mod refresh;
pub mod register;

use std::sync::Arc;

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::{AuthService, HealthProbe, OAuthClient};

/// Application state shared by every worker
pub struct AppState<U, R, O, S>
where
    U: UserRepository,
    R: RevocationStore,
    O: OAuthClient,
    S: OAuthStateStore,
{
    pub auth_service: Arc<AuthService<U, R, O, S>>,
    /// Dependencies checked by `/health/ready`
    pub health_probes: Vec<Arc<dyn HealthProbe>>,
}

impl<U, R, O, S> AppState<U, R, O, S>
where
    U: UserRepository,
    R: RevocationStore,
    O: OAuthClient,
    S: OAuthStateStore,
{
    pub fn new(auth_service: Arc<AuthService<U, R, O, S>>) -> Self {
        Self {
            auth_service,
            health_probes: Vec::new(),
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.health_probes.push(probe);
        self
    }
}
