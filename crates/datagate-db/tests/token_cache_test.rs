//! Integration tests for the token cache implementations.

use std::collections::BTreeSet;

use chrono::Utc;
use datagate_core::GatewayError;
use datagate_core::models::provider::Provider;
use datagate_core::models::scope::{CnafScope, Scope};
use datagate_core::models::token::{Token, TokenValue};
use datagate_core::repository::TokenCache;
use datagate_db::memory::MemoryTokenCache;
use datagate_db::repository::SurrealTokenCache;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> SurrealTokenCache<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    datagate_db::run_migrations(&db).await.unwrap();
    SurrealTokenCache::new(db)
}

fn token(raw: &str) -> Token {
    Token {
        digest: TokenValue::new(raw).digest(),
        application_id: Uuid::new_v4(),
        scopes: BTreeSet::from([Scope::Cnaf(CnafScope::Adresse)]),
        subscriptions: BTreeSet::from([Provider::Cnaf]),
        created_at: Utc::now(),
    }
}

async fn save_and_find<C: TokenCache>(cache: &C) {
    let token = token("credential-a");
    cache.save(token.clone()).await.unwrap();

    let found = cache.find_by_digest(&token.digest).await.unwrap();
    assert_eq!(found.application_id, token.application_id);
    assert_eq!(found.scopes, token.scopes);
    assert_eq!(found.subscriptions, token.subscriptions);
}

async fn unknown_digest_is_not_found<C: TokenCache>(cache: &C) {
    let err = cache
        .find_by_digest(&TokenValue::new("never-issued").digest())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::CredentialNotFound));
}

async fn save_replaces_entry<C: TokenCache>(cache: &C) {
    let mut token = token("credential-b");
    cache.save(token.clone()).await.unwrap();

    token.subscriptions.insert(Provider::Mesri);
    cache.save(token.clone()).await.unwrap();

    let found = cache.find_by_digest(&token.digest).await.unwrap();
    assert!(found.subscriptions.contains(&Provider::Mesri));
}

#[tokio::test]
async fn surreal_save_and_find() {
    save_and_find(&setup().await).await;
}

#[tokio::test]
async fn surreal_unknown_digest_is_not_found() {
    unknown_digest_is_not_found(&setup().await).await;
}

#[tokio::test]
async fn surreal_save_replaces_entry() {
    save_replaces_entry(&setup().await).await;
}

#[tokio::test]
async fn memory_save_and_find() {
    save_and_find(&MemoryTokenCache::new()).await;
}

#[tokio::test]
async fn memory_unknown_digest_is_not_found() {
    unknown_digest_is_not_found(&MemoryTokenCache::new()).await;
}

#[tokio::test]
async fn memory_save_replaces_entry() {
    save_replaces_entry(&MemoryTokenCache::new()).await;
}
