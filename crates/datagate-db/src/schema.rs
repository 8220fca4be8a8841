//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. UUIDs are stored as strings; events and
//! tokens keep their full JSON encoding in `payload` next to the
//! columns used for lookup and ordering.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "event_log_and_token_cache",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Application event log (append-only, one stream per application)
-- =======================================================================
DEFINE TABLE application_event SCHEMAFULL;
DEFINE FIELD application_id ON TABLE application_event TYPE string;
DEFINE FIELD version ON TABLE application_event TYPE int;
DEFINE FIELD kind ON TABLE application_event TYPE string \
    ASSERT $value IN ['ApplicationCreated', 'UserSubscribed', \
    'TokenCreated', 'SubscriptionGranted', 'ScopesGranted'];
DEFINE FIELD occurred_at ON TABLE application_event TYPE datetime;
DEFINE FIELD payload ON TABLE application_event TYPE string;
DEFINE INDEX idx_application_event_version ON TABLE application_event \
    COLUMNS application_id, version UNIQUE;

-- =======================================================================
-- Token cache (read side, keyed by credential digest)
-- =======================================================================
DEFINE TABLE token SCHEMAFULL;
DEFINE FIELD application_id ON TABLE token TYPE string;
DEFINE FIELD payload ON TABLE token TYPE string;
DEFINE FIELD created_at ON TABLE token TYPE datetime;
DEFINE INDEX idx_token_application ON TABLE token COLUMNS application_id;
";

/// Apply all pending migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "recording v{} failed: {}",
                    migration.version, e,
                ))
            })?;
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
