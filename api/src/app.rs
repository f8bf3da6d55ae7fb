//! Application factory
//!
//! Builds the actix `App` from an already wired [`AppState`]; `main` and the
//! integration tests share it.

use std::sync::Arc;

use actix_web::{
    error::InternalError, middleware::Logger, web, App, HttpResponse,
};

use crate::middleware::{auth::JwtAuth, cors::create_cors, TokenValidator};
use crate::routes::auth::{
    login::login, logout::logout, me::me, oauth::{oauth_callback, oauth_login},
    refresh::refresh_token, register::register, AppState,
};
use crate::routes::health::{health_check, readiness};

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;
use gk_shared::{error_codes, CorsConfig, Environment, ErrorResponse};

/// Create and configure the application with all dependencies
pub fn create_app<U, R, O, S>(
    app_state: web::Data<AppState<U, R, O, S>>,
    cors_config: &CorsConfig,
    environment: Environment,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    let validator: Arc<dyn TokenValidator> = app_state.auth_service.token_service().clone();

    App::new()
        .app_data(app_state)
        .app_data(web::Data::new(validator))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            log::debug!("Rejected request body: {}", err);
            let response = HttpResponse::BadRequest().json(ErrorResponse::new(
                error_codes::VALIDATION_ERROR,
                "Invalid request body",
            ));
            InternalError::from_response(err, response).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(ErrorResponse::new(
                error_codes::VALIDATION_ERROR,
                "Invalid query string",
            ));
            InternalError::from_response(err, response).into()
        }))
        .wrap(create_cors(cors_config, environment))
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check))
        .route("/health/ready", web::get().to(readiness::<U, R, O, S>))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(register::<U, R, O, S>))
                .route("/login", web::post().to(login::<U, R, O, S>))
                .route("/login/{provider}", web::get().to(oauth_login::<U, R, O, S>))
                .route(
                    "/login/{provider}/callback",
                    web::get().to(oauth_callback::<U, R, O, S>),
                )
                .route("/refresh", web::post().to(refresh_token::<U, R, O, S>))
                .route(
                    "/logout",
                    web::post().to(logout::<U, R, O, S>).wrap(JwtAuth::new()),
                )
                .route("/me", web::get().to(me::<U, R, O, S>).wrap(JwtAuth::new())),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
