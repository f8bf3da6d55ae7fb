//! Unit tests for the mock OAuth state store

use std::time::Duration;

use crate::domain::entities::oauth::OAuthProvider;
use crate::repositories::oauth_state::{MockOAuthStateStore, OAuthStateStore};

#[tokio::test]
async fn test_state_is_single_use() {
    let store = MockOAuthStateStore::new();
    store
        .save("abc", OAuthProvider::Github, Duration::from_secs(600))
        .await
        .unwrap();

    assert_eq!(store.pending_states().await, vec!["abc".to_string()]);
    assert_eq!(
        store.consume("abc").await.unwrap(),
        Some(OAuthProvider::Github)
    );
    assert_eq!(store.consume("abc").await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_state_expires() {
    let store = MockOAuthStateStore::new();
    store
        .save("abc", OAuthProvider::Google, Duration::from_secs(600))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(601)).await;
    assert_eq!(store.consume("abc").await.unwrap(), None);
}
