//! CORS middleware configuration for cross-origin requests.
//!
//! Development is permissive. Production only admits the origins listed in
//! `ALLOWED_ORIGINS`; a `*` entry opens it up explicitly.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use gk_shared::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the given environment
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config.max_age)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![Method::GET, Method::POST, Method::OPTIONS]
}

/// Creates CORS configuration for development environment.
fn create_development_cors(max_age: usize) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::CACHE_CONTROL,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::WWW_AUTHENTICATE])
        .max_age(max_age)
        .supports_credentials()
}

/// Creates CORS configuration for production environment.
fn create_production_cors(config: &CorsConfig) -> Cors {
    log::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::WWW_AUTHENTICATE])
        .max_age(config.max_age);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        log::warn!("ALLOWED_ORIGINS contains '*', accepting any origin in production");
        return cors.allow_any_origin();
    }

    if config.allowed_origins.is_empty() {
        log::warn!("No ALLOWED_ORIGINS configured, cross-origin requests will be refused");
    }

    for origin in &config.allowed_origins {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors.supports_credentials()
}
