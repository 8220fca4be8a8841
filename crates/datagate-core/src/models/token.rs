//! Credential (token) domain model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::provider::Provider;
use super::scope::Scope;

/// Raw opaque credential value as presented by a client.
///
/// Only its digest is ever recorded; `Debug` does not print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenValue(String);

impl TokenValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the raw value, hex-encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenValue(..)")
    }
}

/// An issued credential, bound to one application.
///
/// `scopes` and `subscriptions` are a snapshot taken at issuance time.
/// They are kept for the read-side cache; authorization always uses
/// the owning application's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub digest: String,
    pub application_id: Uuid,
    pub scopes: BTreeSet<Scope>,
    pub subscriptions: BTreeSet<Provider>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_hex() {
        let value = TokenValue::new("some-credential");
        assert_eq!(value.digest(), value.digest());
        assert_eq!(value.digest().len(), 64);
        assert_ne!(value.digest(), TokenValue::new("other").digest());
    }

    #[test]
    fn debug_hides_raw_value() {
        let value = TokenValue::new("secret-value");
        assert!(!format!("{value:?}").contains("secret"));
    }
}
