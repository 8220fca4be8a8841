//! Credential configuration.

use serde::Deserialize;

/// Configuration for credential issuance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Random bytes per credential (default: 32).
    pub credential_bytes: usize,
    /// Prefix prepended to every issued credential, e.g. `dg_`.
    pub credential_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credential_bytes: 32,
            credential_prefix: String::new(),
        }
    }
}
