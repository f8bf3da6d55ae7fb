//! Integration tests for the Redis-backed stores
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p gk_infra --test redis_integration -- --ignored

use std::time::Duration;

use gk_core::domain::entities::oauth::OAuthProvider;
use gk_core::repositories::{OAuthStateStore, RevocationStore};
use gk_core::services::HealthProbe;
use gk_infra::cache::{CacheConfig, RedisClient, RedisOAuthStateStore, RedisRevocationList};
use uuid::Uuid;

fn client() -> RedisClient {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    RedisClient::new(CacheConfig::new(url)).unwrap()
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_health_check() {
    let client = client();
    assert!(client.health_check().await.unwrap());
    assert!(client.check().await.is_ok());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_get_and_delete() {
    let client = client();
    let key = format!("test:{}", Uuid::new_v4());

    client.set_with_expiry(&key, "value", 60).await.unwrap();
    assert_eq!(client.get(&key).await.unwrap(), Some("value".to_string()));

    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 60);

    assert!(client.delete(&key).await.unwrap());
    assert_eq!(client.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_revocation_entry_carries_ttl() {
    let client = client();
    let list = RedisRevocationList::new(client.clone());
    let jti = Uuid::new_v4().to_string();

    assert!(!list.is_revoked(&jti).await.unwrap());
    assert!(list.revoke(&jti, Duration::from_secs(120)).await.unwrap());
    assert!(list.is_revoked(&jti).await.unwrap());

    let key = format!("blacklist:{}", jti);
    assert_eq!(client.get(&key).await.unwrap().as_deref(), Some("revoked"));
    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 110 && ttl <= 120);

    // Revoking again leaves the first entry in place
    assert!(!list.revoke(&jti, Duration::from_secs(600)).await.unwrap());
    assert!(list.is_revoked(&jti).await.unwrap());
    assert!(client.ttl(&key).await.unwrap().unwrap() <= 120);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_revocation_entry_expires() {
    let list = RedisRevocationList::new(client());
    let jti = Uuid::new_v4().to_string();

    list.revoke(&jti, Duration::from_secs(1)).await.unwrap();
    assert!(list.is_revoked(&jti).await.unwrap());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(!list.is_revoked(&jti).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_oauth_state_consumed_once() {
    let store = RedisOAuthStateStore::new(client());
    let state = Uuid::new_v4().simple().to_string();

    store
        .save(&state, OAuthProvider::Google, Duration::from_secs(600))
        .await
        .unwrap();

    assert_eq!(
        store.consume(&state).await.unwrap(),
        Some(OAuthProvider::Google)
    );
    assert_eq!(store.consume(&state).await.unwrap(), None);
}
