//! In-memory implementations of the core storage traits.
//!
//! Same contracts as the SurrealDB implementations; cloning shares the
//! underlying storage.

use std::collections::HashMap;
use std::sync::Arc;

use datagate_core::error::{GatewayError, GatewayResult};
use datagate_core::models::event::ApplicationEvent;
use datagate_core::models::token::Token;
use datagate_core::repository::{EventStore, TokenCache};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    histories: Arc<RwLock<HashMap<Uuid, Vec<ApplicationEvent>>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryEventStore {
    async fn append(
        &self,
        application_id: Uuid,
        events: Vec<ApplicationEvent>,
        expected_version: u64,
    ) -> GatewayResult<u64> {
        let mut histories = self.histories.write().await;

        let actual = histories
            .get(&application_id)
            .map_or(0, |history| history.len() as u64);
        if actual != expected_version {
            return Err(GatewayError::ConcurrentModification {
                application_id,
                expected: expected_version,
                actual,
            });
        }
        if let Some(foreign) = events.iter().find(|e| e.application_id != application_id) {
            return Err(GatewayError::Internal(format!(
                "event for {} appended to {application_id}",
                foreign.application_id
            )));
        }

        if events.is_empty() {
            return Ok(actual);
        }

        let history = histories.entry(application_id).or_default();
        history.extend(events);
        Ok(history.len() as u64)
    }

    async fn load_history(&self, application_id: Uuid) -> GatewayResult<Vec<ApplicationEvent>> {
        Ok(self
            .histories
            .read()
            .await
            .get(&application_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTokenCache {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenCache for MemoryTokenCache {
    async fn save(&self, token: Token) -> GatewayResult<()> {
        self.tokens.write().await.insert(token.digest.clone(), token);
        Ok(())
    }

    async fn find_by_digest(&self, digest: &str) -> GatewayResult<Token> {
        self.tokens
            .read()
            .await
            .get(digest)
            .cloned()
            .ok_or(GatewayError::CredentialNotFound)
    }
}
