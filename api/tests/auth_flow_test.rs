//! Integration tests for password login, refresh, logout and `/auth/me`

mod common;

use actix_web::{http::header, http::StatusCode, test};
use serde_json::{json, Value};

use common::{bearer, login_request, register_request, without_timestamp, TestContext};

#[actix_web::test]
async fn test_register_then_login_and_me() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("alice", "Alice@Example.com", "correct horse").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(resp).await;
    assert_eq!(registered["user"]["email"], "alice@example.com");
    assert_eq!(registered["token_type"], "bearer");

    let resp = test::call_service(&app, login_request("alice", "correct horse").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["expires_in"], 30 * 60);
    let access_token = body["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["id"], registered["user"]["id"]);
    assert_eq!(me["username"], "alice");
}

#[actix_web::test]
async fn test_login_by_email_alias_field() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    test::call_service(
        &app,
        register_request("bob", "bob@example.com", "hunter2hunter2").to_request(),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "BOB@example.com", "password": "hunter2hunter2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    test::call_service(
        &app,
        register_request("carol", "carol@example.com", "right-password").to_request(),
    )
    .await;

    let wrong_password =
        test::call_service(&app, login_request("carol", "wrong-password").to_request()).await;
    let unknown_user =
        test::call_service(&app, login_request("nobody", "wrong-password").to_request()).await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.headers().get(header::WWW_AUTHENTICATE),
        unknown_user.headers().get(header::WWW_AUTHENTICATE)
    );

    let a: Value = test::read_body_json(wrong_password).await;
    let b: Value = test::read_body_json(unknown_user).await;
    assert_eq!(without_timestamp(a.clone()), without_timestamp(b));
    assert_eq!(a["error"], "invalid_credentials");
}

#[actix_web::test]
async fn test_login_fails_closed_when_user_store_is_down() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.users.set_unavailable(true);

    let resp = test::call_service(&app, login_request("alice", "whatever").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "internal_error");
}

#[actix_web::test]
async fn test_register_duplicate_and_invalid() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let first = test::call_service(
        &app,
        register_request("dave", "dave@example.com", "password-1").to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let duplicate = test::call_service(
        &app,
        register_request("dave2", "DAVE@example.com", "password-2").to_request(),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(duplicate).await;
    assert_eq!(body["error"], "user_already_exists");

    let invalid = test::call_service(
        &app,
        register_request("d", "not-an-email", "short").to_request(),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(invalid).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"]["password"].is_array());
    assert_eq!(ctx.users.count().await, 1);
}

#[actix_web::test]
async fn test_register_rejects_username_with_at_sign() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("a@b", "ab@example.com", "password-1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"]["username"].is_array());
    assert_eq!(ctx.users.count().await, 0);
}

#[actix_web::test]
async fn test_malformed_json_is_a_validation_error() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn test_logout_revokes_access_token() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("erin", "erin@example.com", "logout-pass").to_request(),
    )
    .await;
    let tokens: Value = test::read_body_json(resp).await;
    let access_token = tokens["access_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logged out successfully");
    assert_eq!(ctx.revocations.active_entries().await, 1);

    // Same token, now revoked
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_with_refresh_token_revokes_both() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("frank", "frank@example.com", "logout-pass").to_request(),
    )
    .await;
    let tokens: Value = test::read_body_json(resp).await;
    let access_token = tokens["access_token"].as_str().unwrap();
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(access_token))
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.revocations.active_entries().await, 2);

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_reports_revocation_failure() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("grace", "grace@example.com", "logout-pass").to_request(),
    )
    .await;
    let tokens: Value = test::read_body_json(resp).await;
    let access_token = tokens["access_token"].as_str().unwrap();

    // Validation fails open, the revocation write does not
    ctx.revocations.set_unavailable(true);

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer(access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("heidi", "heidi@example.com", "refresh-pass").to_request(),
    )
    .await;
    let tokens: Value = test::read_body_json(resp).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated: Value = test::read_body_json(resp).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);
    assert_eq!(rotated["user"]["username"], "heidi");

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_token");
}

#[actix_web::test]
async fn test_access_token_cannot_refresh() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let resp = test::call_service(
        &app,
        register_request("ivan", "ivan@example.com", "refresh-pass").to_request(),
    )
    .await;
    let tokens: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": tokens["access_token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
