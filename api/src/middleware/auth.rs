//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware takes the bearer token from the `Authorization` header,
//! validates it through the [`TokenValidator`] registered as app data
//! (signature, expiry, revocation) and stores an [`AuthContext`] in the
//! request extensions for the handler.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use gk_core::{
    domain::entities::token::Claims,
    errors::DomainError,
    repositories::RevocationStore,
    services::token::TokenService,
};
use gk_shared::error_codes;

use crate::handlers::error::unauthorized;

const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

/// Caller identity injected into authenticated requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Token subject, the user id
    pub subject: String,
    /// Full claims of the presented token, needed to revoke it
    pub claims: Claims,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            subject: claims.sub.clone(),
            claims,
        }
    }
}

/// Validation seam between the middleware and the token service
///
/// Registered as `web::Data<Arc<dyn TokenValidator>>` so the middleware
/// does not need the service's type parameters.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_token(&self, token: &str) -> Result<Claims, DomainError>;
}

#[async_trait]
impl<R: RevocationStore + 'static> TokenValidator for TokenService<R> {
    async fn validate_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.validate(token).await
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req) else {
                log::debug!("Request without bearer token to {}", req.path());
                return Ok(req.into_response(invalid_token()).map_into_right_body());
            };

            let Some(validator) = req.app_data::<web::Data<Arc<dyn TokenValidator>>>().cloned()
            else {
                log::error!("No token validator registered, refusing authenticated route");
                return Ok(req.into_response(invalid_token()).map_into_right_body());
            };

            let claims = match validator.validate_token(&token).await {
                Ok(claims) => claims,
                Err(e) => {
                    log::debug!("Bearer token rejected: {}", e);
                    return Ok(req.into_response(invalid_token()).map_into_right_body());
                }
            };

            // Refresh tokens are only good at /auth/refresh
            if claims.is_refresh() {
                log::debug!("Refresh token presented as bearer");
                return Ok(req.into_response(invalid_token()).map_into_right_body());
            }

            req.extensions_mut().insert(AuthContext::from_claims(claims));

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Uniform 401 for every authentication failure
fn invalid_token() -> HttpResponse {
    unauthorized(error_codes::INVALID_TOKEN, INVALID_TOKEN_MESSAGE)
}

/// Extracts Bearer token from Authorization header
///
/// The scheme name is matched case-insensitively.
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result: Result<Self, Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                InternalError::from_response("route is missing JwtAuth", invalid_token()).into()
            });

        ready(result)
    }
}
