//! Integration tests for the OAuth redirect and callback endpoints

mod common;

use actix_web::{http::header, http::StatusCode, test};
use serde_json::Value;

use gk_core::domain::entities::oauth::{OAuthIdentity, OAuthProvider};
use gk_core::services::MockOAuthClient;

use common::TestContext;

/// `state` query parameter of a redirect location
fn state_from_location(location: &str) -> String {
    location
        .split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("state="))
        .expect("redirect carries a state")
        .to_string()
}

fn callback_uri(provider: &str, code: &str, state: &str) -> String {
    format!("/auth/login/{}/callback?code={}&state={}", provider, code, state)
}

#[actix_web::test]
async fn test_oauth_login_redirects_and_callback_issues_tokens() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/auth/login/google").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://google.example.test/authorize"));
    let state = state_from_location(&location);
    assert_eq!(state.len(), 64);
    assert_eq!(ctx.states.pending_states().await, vec![state.clone()]);

    ctx.oauth
        .register_code(
            "google-code",
            OAuthIdentity::new(OAuthProvider::Google, Some("Judy@Example.com".to_string())),
        )
        .await;

    let req = test::TestRequest::get()
        .uri(&callback_uri("google", "google-code", &state))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "judy@example.com");
    assert_eq!(body["user"]["username"], "judy");
    assert!(body["access_token"].is_string());

    // The state is single use
    let req = test::TestRequest::get()
        .uri(&callback_uri("google", "google-code", &state))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_oauth_state");
}

#[actix_web::test]
async fn test_oauth_user_cannot_password_login() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/auth/login/github").to_request(),
    )
    .await;
    let state = state_from_location(resp.headers().get(header::LOCATION).unwrap().to_str().unwrap());

    ctx.oauth
        .register_code(
            "gh-code",
            OAuthIdentity::new(OAuthProvider::Github, Some("kim@example.com".to_string())),
        )
        .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&callback_uri("github", "gh-code", &state))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        common::login_request("kim@example.com", "").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        common::login_request("kim@example.com", "guess").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_callback_with_unknown_state() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get()
        .uri(&callback_uri("google", "code", "deadbeef"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/auth/login/google/callback?code=code")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_callback_with_failed_exchange_is_generic() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/auth/login/google").to_request(),
    )
    .await;
    let state = state_from_location(resp.headers().get(header::LOCATION).unwrap().to_str().unwrap());

    let req = test::TestRequest::get()
        .uri(&callback_uri("google", "unregistered-code", &state))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "authentication_failed");
    assert_eq!(ctx.users.count().await, 0);
}

#[actix_web::test]
async fn test_callback_with_provider_error() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get()
        .uri("/auth/login/github/callback?error=access_denied")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_callback_without_email() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/auth/login/github").to_request(),
    )
    .await;
    let state = state_from_location(resp.headers().get(header::LOCATION).unwrap().to_str().unwrap());

    ctx.oauth
        .register_code("no-email", OAuthIdentity::new(OAuthProvider::Github, None))
        .await;
    let req = test::TestRequest::get()
        .uri(&callback_uri("github", "no-email", &state))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "oauth_email_missing");
}

#[actix_web::test]
async fn test_unknown_provider_is_not_found() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/auth/login/gitlab").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown_provider");
}

#[actix_web::test]
async fn test_unconfigured_provider_is_unavailable() {
    let ctx = TestContext::with_oauth(MockOAuthClient::with_providers(&[OAuthProvider::Github]));
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/auth/login/google").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "provider_not_configured");
    assert!(ctx.states.pending_states().await.is_empty());
}
