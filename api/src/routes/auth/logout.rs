use actix_web::{web, HttpResponse};

use crate::dto::auth::{LogoutRequest, LogoutResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use super::AppState;

/// Handler for POST /auth/logout
///
/// Revokes the bearer token until it would have expired anyway. A refresh
/// token in the optional body is revoked as well.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid or already revoked access token
/// - 500 Internal Server Error: Revocation list unavailable
pub async fn logout<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    auth: AuthContext,
    body: Option<web::Json<LogoutRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    let refresh_token = body.and_then(|body| body.into_inner().refresh_token);

    match state
        .auth_service
        .logout(&auth.claims, refresh_token.as_deref())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
