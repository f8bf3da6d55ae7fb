use actix_web::{web, HttpResponse};

use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use super::AppState;

/// Handler for POST /auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is revoked,
/// so presenting it again fails with 401.
pub async fn refresh_token<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
