use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::LoginRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use super::AppState;

/// Handler for POST /auth/login
///
/// # Request Body
///
/// ```json
/// {
///     "login": "alice@example.com",
///     "password": "string"
/// }
/// ```
///
/// `email` and `username` are accepted in place of `login`.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "bearer",
///     "expires_in": 1800,
///     "user": { "id": "...", "username": "alice", "email": "alice@example.com" }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: `invalid_credentials`, whatever the cause
/// - 500 Internal Server Error: user store unavailable
pub async fn login<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(errors);
    }

    match state
        .auth_service
        .login(&request.login, &request.password)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
