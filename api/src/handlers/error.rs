//! Mapping of domain errors to HTTP responses
//!
//! Every failure leaves the API as an [`ErrorResponse`]. Authentication
//! failures carry a fixed message so clients cannot tell the causes apart,
//! and internal failures are logged here and returned without detail.

use actix_web::{http::header, HttpResponse, HttpResponseBuilder};
use validator::ValidationErrors;

use gk_core::errors::{AuthError, DomainError, TokenError};
use gk_shared::{error_codes, ErrorResponse};

const INTERNAL_MESSAGE: &str = "An internal error occurred. Please try again later";

/// 401 with the bearer challenge
pub fn unauthorized(code: &str, message: &str) -> HttpResponse {
    with_challenge(HttpResponse::Unauthorized()).json(ErrorResponse::new(code, message))
}

fn with_challenge(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
    builder
}

/// Convert domain errors to HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => {
            let message = auth_error.to_string();
            match auth_error {
                AuthError::InvalidCredentials => {
                    unauthorized(error_codes::INVALID_CREDENTIALS, &message)
                }
                AuthError::AuthenticationFailed => {
                    unauthorized(error_codes::AUTHENTICATION_FAILED, &message)
                }
                AuthError::OAuthEmailMissing => HttpResponse::BadRequest()
                    .json(ErrorResponse::new(error_codes::OAUTH_EMAIL_MISSING, message)),
                AuthError::InvalidOAuthState => HttpResponse::BadRequest()
                    .json(ErrorResponse::new(error_codes::INVALID_OAUTH_STATE, message)),
                AuthError::ProviderNotConfigured { provider } => {
                    log::warn!("OAuth login attempted with unconfigured provider {}", provider);
                    HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                        error_codes::PROVIDER_NOT_CONFIGURED,
                        message,
                    ))
                }
                AuthError::UnknownProvider { .. } => HttpResponse::NotFound()
                    .json(ErrorResponse::new(error_codes::UNKNOWN_PROVIDER, message)),
                AuthError::UserAlreadyExists => HttpResponse::Conflict()
                    .json(ErrorResponse::new(error_codes::USER_ALREADY_EXISTS, message)),
            }
        }
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidOrExpired => {
                unauthorized(error_codes::INVALID_TOKEN, &token_error.to_string())
            }
            TokenError::TokenGenerationFailed | TokenError::RevocationFailed => {
                log::error!("Token operation failed: {}", token_error);
                internal_error()
            }
        },
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message)),
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            internal_error()
        }
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ErrorResponse::new(error_codes::INTERNAL_ERROR, INTERNAL_MESSAGE))
}

/// Handle validation errors from request DTOs
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        "Request validation failed",
    );

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    for (field, field_errors) in fields {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", e.code))
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn test_invalid_credentials_maps_to_401_with_challenge() {
        let response = handle_domain_error(AuthError::InvalidCredentials.into());

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_credentials");
        assert_eq!(body["message"], "Incorrect username or password");
    }

    #[test]
    fn test_status_codes() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (DomainError::invalid_token(), StatusCode::UNAUTHORIZED),
            (AuthError::AuthenticationFailed.into(), StatusCode::UNAUTHORIZED),
            (AuthError::InvalidOAuthState.into(), StatusCode::BAD_REQUEST),
            (AuthError::OAuthEmailMissing.into(), StatusCode::BAD_REQUEST),
            (
                AuthError::UnknownProvider { provider: "gitlab".into() }.into(),
                StatusCode::NOT_FOUND,
            ),
            (
                AuthError::ProviderNotConfigured { provider: "google".into() }.into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AuthError::UserAlreadyExists.into(), StatusCode::CONFLICT),
            (
                DomainError::Validation { message: "bad".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                TokenError::RevocationFailed.into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let label = error.to_string();
            assert_eq!(handle_domain_error(error).status(), expected, "{}", label);
        }
    }

    #[actix_rt::test]
    async fn test_internal_error_hides_detail() {
        let response = handle_domain_error(DomainError::internal("connection refused at 10.0.0.5"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert!(!body["message"].as_str().unwrap().contains("10.0.0.5"));
    }
}
