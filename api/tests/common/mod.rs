//! Shared fixture for the API integration tests
//!
//! Wires the real services over the in-memory mocks from `gk_core`.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    test, web, App, Error,
};
use serde_json::{json, Value};

use gk_api::{create_app, AppState};
use gk_core::repositories::{MockOAuthStateStore, MockRevocationStore, MockUserRepository};
use gk_core::services::{
    AuthService, AuthServiceConfig, MockOAuthClient, TokenService, TokenServiceConfig,
};
use gk_shared::{CorsConfig, Environment};

pub type TestState =
    AppState<MockUserRepository, MockRevocationStore, MockOAuthClient, MockOAuthStateStore>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub users: MockUserRepository,
    pub revocations: MockRevocationStore,
    pub oauth: MockOAuthClient,
    pub states: MockOAuthStateStore,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_oauth(MockOAuthClient::new())
    }

    pub fn with_oauth(oauth: MockOAuthClient) -> Self {
        Self::build(oauth, |state| state)
    }

    pub fn build(oauth: MockOAuthClient, customize: impl FnOnce(TestState) -> TestState) -> Self {
        let users = MockUserRepository::new();
        let revocations = MockRevocationStore::new();
        let states = MockOAuthStateStore::new();

        let token_service = Arc::new(TokenService::new(
            revocations.clone(),
            TokenServiceConfig::new("api-integration-test-secret"),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(users.clone()),
            token_service,
            Arc::new(oauth.clone()),
            Arc::new(states.clone()),
            AuthServiceConfig::default().with_bcrypt_cost(4),
        ));

        Self {
            state: web::Data::new(customize(AppState::new(auth_service))),
            users,
            revocations,
            oauth,
            states,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        create_app(
            self.state.clone(),
            &CorsConfig::default(),
            Environment::Development,
        )
    }
}

pub fn register_request(username: &str, email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/auth/register").set_json(json!({
        "username": username,
        "email": email,
        "password": password,
    }))
}

pub fn login_request(login: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "login": login, "password": password }))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Error body without the per-response timestamp
pub fn without_timestamp(mut body: Value) -> Value {
    if let Some(object) = body.as_object_mut() {
        object.remove("timestamp");
    }
    body
}
