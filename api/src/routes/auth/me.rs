use actix_web::{web, HttpResponse};

use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use super::AppState;

/// Handler for GET /auth/me
///
/// Returns `{id, username, email}` of the bearer's account.
pub async fn me<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    match state.auth_service.me(&auth.claims).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(error) => handle_domain_error(error),
    }
}
