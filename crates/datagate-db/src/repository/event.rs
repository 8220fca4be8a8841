//! SurrealDB implementation of [`EventStore`].

use chrono::{DateTime, Utc};
use datagate_core::error::{GatewayError, GatewayResult};
use datagate_core::models::event::ApplicationEvent;
use datagate_core::repository::EventStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct EventRow {
    application_id: String,
    version: u64,
    kind: String,
    occurred_at: DateTime<Utc>,
    payload: String,
}

impl EventRow {
    fn encode(event: &ApplicationEvent, version: u64) -> Result<Self, DbError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| DbError::Decode(format!("event encode: {e}")))?;
        Ok(Self {
            application_id: event.application_id.to_string(),
            version,
            kind: event.kind.name().to_string(),
            occurred_at: event.occurred_at,
            payload,
        })
    }

    fn decode(self) -> Result<ApplicationEvent, DbError> {
        serde_json::from_str(&self.payload)
            .map_err(|e| DbError::Decode(format!("event v{}: {e}", self.version)))
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the event log.
///
/// Each event is a row numbered from 1 within its application; a
/// unique index on (application_id, version) backs the optimistic
/// version check.
#[derive(Clone)]
pub struct SurrealEventStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEventStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn current_version(&self, application_id: Uuid) -> Result<u64, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM application_event \
                 WHERE application_id = $application_id GROUP ALL",
            )
            .bind(("application_id", application_id.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> EventStore for SurrealEventStore<C> {
    async fn append(
        &self,
        application_id: Uuid,
        events: Vec<ApplicationEvent>,
        expected_version: u64,
    ) -> GatewayResult<u64> {
        let conflict = |actual: u64| GatewayError::ConcurrentModification {
            application_id,
            expected: expected_version,
            actual,
        };

        let actual = self.current_version(application_id).await?;
        if actual != expected_version {
            warn!(
                application_id = %application_id,
                expected = expected_version,
                actual,
                "Event append rejected"
            );
            return Err(conflict(actual));
        }
        if events.is_empty() {
            return Ok(expected_version);
        }
        if let Some(foreign) = events.iter().find(|e| e.application_id != application_id) {
            return Err(GatewayError::Internal(format!(
                "event for {} appended to {application_id}",
                foreign.application_id
            )));
        }

        let rows = events
            .iter()
            .zip(expected_version + 1..)
            .map(|(event, version)| EventRow::encode(event, version))
            .collect::<Result<Vec<_>, _>>()?;
        let new_version = expected_version + rows.len() as u64;

        // The count is re-checked inside the transaction; the unique
        // index rejects any writer that slips past it.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 LET $current = array::len((SELECT id FROM application_event \
                     WHERE application_id = $application_id)); \
                 IF $current != $expected_version { THROW 'version conflict' }; \
                 INSERT INTO application_event $rows; \
                 COMMIT TRANSACTION;",
            )
            .bind(("application_id", application_id.to_string()))
            .bind(("expected_version", expected_version))
            .bind(("rows", rows))
            .await
            .map_err(DbError::from)?;

        if let Err(e) = result.check() {
            let actual = self.current_version(application_id).await?;
            if actual != expected_version {
                warn!(
                    application_id = %application_id,
                    expected = expected_version,
                    actual,
                    "Event append lost a race"
                );
                return Err(conflict(actual));
            }
            return Err(DbError::Query(e.to_string()).into());
        }

        debug!(application_id = %application_id, version = new_version, "Events appended");
        Ok(new_version)
    }

    async fn load_history(&self, application_id: Uuid) -> GatewayResult<Vec<ApplicationEvent>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM application_event \
                 WHERE application_id = $application_id \
                 ORDER BY version ASC",
            )
            .bind(("application_id", application_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EventRow> = result.take(0).map_err(DbError::from)?;

        let mut history = Vec::with_capacity(rows.len());
        for (row, expected) in rows.into_iter().zip(1u64..) {
            if row.version != expected {
                return Err(GatewayError::CorruptHistory {
                    application_id,
                    reason: format!("version {} found at position {expected}", row.version),
                });
            }
            history.push(row.decode()?);
        }
        Ok(history)
    }
}
