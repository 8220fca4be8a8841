//! Credential error types.

use datagate_core::error::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credential not found")]
    CredentialNotFound,

    #[error("malformed credential")]
    CredentialMalformed,

    /// The cache knows the credential but its application no longer
    /// lists it.
    #[error("credential is stale")]
    CredentialStale,
}

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialNotFound
            | AuthError::CredentialMalformed
            | AuthError::CredentialStale => GatewayError::CredentialNotFound,
        }
    }
}
