//! OAuth login: redirect to the provider and handle its callback

use actix_web::{http::header, web, HttpResponse};

use crate::dto::auth::OAuthCallbackQuery;
use crate::handlers::error::handle_domain_error;

use gk_core::domain::entities::oauth::OAuthProvider;
use gk_core::errors::{AuthError, DomainError};
use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use super::AppState;

/// Handler for GET /auth/login/{provider}
///
/// Redirects (302) to the provider's consent page. Unknown providers get
/// 404, providers without credentials 503.
pub async fn oauth_login<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    provider: web::Path<String>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    let provider = match provider.parse::<OAuthProvider>() {
        Ok(provider) => provider,
        Err(error) => return handle_domain_error(error),
    };

    match state.auth_service.begin_oauth(provider).await {
        Ok(url) => HttpResponse::Found()
            .insert_header((header::LOCATION, url))
            .finish(),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /auth/login/{provider}/callback
///
/// # Query
/// - `code`: authorization code from the provider
/// - `state`: the value issued by [`oauth_login`]
/// - `error`: set by the provider when the user declined
pub async fn oauth_callback<U, R, O, S>(
    state: web::Data<AppState<U, R, O, S>>,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    let provider = match provider.parse::<OAuthProvider>() {
        Ok(provider) => provider,
        Err(error) => return handle_domain_error(error),
    };

    let query = query.into_inner();
    if let Some(error) = query.error {
        log::info!("{} callback returned error '{}'", provider, error);
        return handle_domain_error(AuthError::AuthenticationFailed.into());
    }

    let Some(oauth_state) = query.state.filter(|s| !s.is_empty()) else {
        return handle_domain_error(AuthError::InvalidOAuthState.into());
    };
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return handle_domain_error(DomainError::Validation {
            message: "Missing authorization code".to_string(),
        });
    };

    match state
        .auth_service
        .complete_oauth(provider, &code, &oauth_state)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}
