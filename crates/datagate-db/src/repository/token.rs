//! SurrealDB implementation of [`TokenCache`].

use datagate_core::error::{GatewayError, GatewayResult};
use datagate_core::models::token::Token;
use datagate_core::repository::TokenCache;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TokenRow {
    payload: String,
}

/// SurrealDB implementation of the credential cache. Records are keyed
/// by credential digest.
#[derive(Clone)]
pub struct SurrealTokenCache<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTokenCache<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TokenCache for SurrealTokenCache<C> {
    async fn save(&self, token: Token) -> GatewayResult<()> {
        let payload = serde_json::to_string(&token)?;

        self.db
            .query(
                "UPSERT type::record('token', $digest) SET \
                 application_id = $application_id, \
                 payload = $payload, \
                 created_at = $created_at",
            )
            .bind(("digest", token.digest))
            .bind(("application_id", token.application_id.to_string()))
            .bind(("payload", payload))
            .bind(("created_at", token.created_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_by_digest(&self, digest: &str) -> GatewayResult<Token> {
        let mut result = self
            .db
            .query("SELECT payload FROM type::record('token', $digest)")
            .bind(("digest", digest.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TokenRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(GatewayError::CredentialNotFound)?;

        serde_json::from_str(&row.payload)
            .map_err(|e| DbError::Decode(format!("token: {e}")).into())
    }
}
