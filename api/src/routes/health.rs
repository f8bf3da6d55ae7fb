//! Liveness and readiness endpoints

use actix_web::{web, HttpResponse};
use serde_json::json;

use gk_core::repositories::{OAuthStateStore, RevocationStore, UserRepository};
use gk_core::services::OAuthClient;

use crate::routes::auth::AppState;

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "gatekeep",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Readiness: every registered dependency must answer
pub async fn readiness<U, R, O, S>(state: web::Data<AppState<U, R, O, S>>) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationStore + 'static,
    O: OAuthClient + 'static,
    S: OAuthStateStore + 'static,
{
    let mut checks = serde_json::Map::new();
    let mut ready = true;

    for probe in &state.health_probes {
        let status = match probe.check().await {
            Ok(()) => "ok",
            Err(e) => {
                log::warn!("Readiness probe '{}' failed: {}", probe.name(), e);
                ready = false;
                "unavailable"
            }
        };
        checks.insert(probe.name().to_string(), json!(status));
    }

    let body = json!({
        "status": if ready { "ready" } else { "unavailable" },
        "checks": checks,
    });

    if ready {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
