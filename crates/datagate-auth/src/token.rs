//! Opaque credential generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use datagate_core::models::token::TokenValue;
use datagate_core::repository::CredentialFactory;
use rand::RngCore;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Generate a cryptographically random opaque credential
/// (`bytes` random bytes → base64url-encoded, no padding).
pub fn generate_credential(bytes: usize, prefix: &str) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    format!("{prefix}{}", URL_SAFE_NO_PAD.encode(buf))
}

/// Longest credential value accepted for lookup.
pub const MAX_CREDENTIAL_LEN: usize = 256;

/// Reject values that cannot be a credential, before any cache lookup.
///
/// Independent of the current [`AuthConfig`]: credentials issued under an
/// earlier prefix or length stay valid.
pub fn check_credential_shape(raw: &str) -> Result<(), AuthError> {
    let well_formed = !raw.is_empty()
        && raw.len() <= MAX_CREDENTIAL_LEN
        && raw.chars().all(|c| c.is_ascii_graphic());
    if well_formed {
        Ok(())
    } else {
        Err(AuthError::CredentialMalformed)
    }
}

/// [`CredentialFactory`] backed by the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct OpaqueCredentialFactory {
    config: AuthConfig,
}

impl OpaqueCredentialFactory {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }
}

impl CredentialFactory for OpaqueCredentialFactory {
    fn generate_credential(&self) -> TokenValue {
        TokenValue::new(generate_credential(
            self.config.credential_bytes,
            &self.config.credential_prefix,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_is_url_safe() {
        let credential = generate_credential(32, "");
        // base64url characters only (A-Z a-z 0-9 - _), no padding.
        assert!(
            credential
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        // 32 bytes → 43 base64url chars.
        assert_eq!(credential.len(), 43);
    }

    #[test]
    fn credentials_are_unique() {
        assert_ne!(generate_credential(32, ""), generate_credential(32, ""));
    }

    #[test]
    fn prefix_is_prepended() {
        assert!(generate_credential(16, "dg_").starts_with("dg_"));
    }

    #[test]
    fn issued_credentials_pass_shape_check() {
        let factory = OpaqueCredentialFactory::new(AuthConfig {
            credential_bytes: 32,
            credential_prefix: "dg_".into(),
        });
        let value = factory.generate_credential();
        assert!(check_credential_shape(value.as_str()).is_ok());
    }

    #[test]
    fn shape_check_ignores_current_config() {
        assert!(check_credential_shape(&generate_credential(16, "old_")).is_ok());
        assert!(check_credential_shape(&generate_credential(64, "")).is_ok());
    }

    #[test]
    fn shape_check_rejects_non_credentials() {
        assert!(check_credential_shape("").is_err());
        assert!(check_credential_shape("not a credential").is_err());
        assert!(check_credential_shape("tab\there").is_err());
        assert!(check_credential_shape(&"A".repeat(MAX_CREDENTIAL_LEN + 1)).is_err());
    }
}
