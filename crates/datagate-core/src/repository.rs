//! Collaborator trait definitions.
//!
//! The event log, the credential cache, upstream provider clients and
//! the identifier/credential generators live outside the core. All I/O
//! operations are async.

use serde::Serialize;
use uuid::Uuid;

use crate::error::GatewayResult;
use crate::models::event::ApplicationEvent;
use crate::models::provider::Provider;
use crate::models::token::{Token, TokenValue};

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

pub trait EventStore: Send + Sync {
    /// Append `events` after the first `expected_version` events of the
    /// application's history. Fails with `ConcurrentModification` when
    /// the stored history has another length; nothing is written then.
    /// Returns the new version.
    fn append(
        &self,
        application_id: Uuid,
        events: Vec<ApplicationEvent>,
        expected_version: u64,
    ) -> impl Future<Output = GatewayResult<u64>> + Send;

    /// Full history of one application, in append order.
    fn load_history(
        &self,
        application_id: Uuid,
    ) -> impl Future<Output = GatewayResult<Vec<ApplicationEvent>>> + Send;
}

// ---------------------------------------------------------------------------
// Read-side credential cache
// ---------------------------------------------------------------------------

pub trait TokenCache: Send + Sync {
    /// Insert or replace the entry for `token.digest`.
    fn save(&self, token: Token) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Fails with `CredentialNotFound` for an unknown digest.
    fn find_by_digest(&self, digest: &str) -> impl Future<Output = GatewayResult<Token>> + Send;
}

// ---------------------------------------------------------------------------
// Upstream providers
// ---------------------------------------------------------------------------

/// Client for one upstream registry.
///
/// Failures are reported as `Upstream` or `Network` errors and are
/// propagated unchanged; retry policy belongs to the client.
pub trait DataProvider: Send + Sync {
    type Input: Send + Sync;
    type Output: Serialize + Send;

    fn provider(&self) -> Provider;

    fn fetch(
        &self,
        input: &Self::Input,
    ) -> impl Future<Output = GatewayResult<Self::Output>> + Send;
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> Uuid;
}

pub trait CredentialFactory: Send + Sync {
    fn generate_credential(&self) -> TokenValue;
}

/// Random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
