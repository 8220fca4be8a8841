//! Database-specific error types and conversions.

use datagate_core::error::GatewayError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),
}

impl From<DbError> for GatewayError {
    fn from(err: DbError) -> Self {
        GatewayError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_surface_as_database_errors() {
        let err: GatewayError = DbError::Decode("event v3: truncated".into()).into();
        assert!(matches!(err, GatewayError::Database(message) if message.contains("event v3")));
    }
}
