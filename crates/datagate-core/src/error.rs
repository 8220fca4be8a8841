//! Error types for the datagate gateway.

use thiserror::Error;
use uuid::Uuid;

use crate::models::provider::Provider;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Bad construction input; nothing was applied.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A scope with no registry entry reached a lookup.
    #[error("Unknown scope {scope} for provider {provider}")]
    UnknownScope { provider: Provider, scope: String },

    #[error("{application_id} has not subscribed to {provider}")]
    ApplicationNotSubscribed {
        application_id: Uuid,
        provider: Provider,
    },

    #[error("Credential not found")]
    CredentialNotFound,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Upstream error from {provider}: {message}")]
    Upstream { provider: Provider, message: String },

    #[error("Network error while calling {provider}: {message}")]
    Network { provider: Provider, message: String },

    #[error(
        "Concurrent modification of application {application_id}: \
         expected version {expected}, found {actual}"
    )]
    ConcurrentModification {
        application_id: Uuid,
        expected: u64,
        actual: u64,
    },

    #[error("Corrupt event history for application {application_id}: {reason}")]
    CorruptHistory { application_id: Uuid, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for failures reported by an upstream provider client.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Network { .. })
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
