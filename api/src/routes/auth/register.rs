use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::RegisterRequest;
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use super::AppState;

/// Handler for POST /auth/register
///
/// Creates a password account and returns its first token pair.
///
/// # Response
/// - 201 Created: `AuthResponse` with tokens and the new user
/// - 400 Bad Request: validation failure
/// - 409 Conflict: username or email already taken
pub async fn register<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.username, &request.email, &request.password)
        .await
    {
        Ok(response) => HttpResponse::Created().json(response),
        Err(error) => handle_domain_error(error),
    }
}
