//! SurrealDB connection management.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema::run_migrations;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Endpoint: `ws://host:port` for a server, `mem://` for an
    /// embedded in-memory store.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials, used for remote endpoints only.
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8000".into(),
            namespace: "datagate".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    pub fn is_embedded(&self) -> bool {
        self.url.starts_with("mem://")
    }
}

/// Owns the SurrealDB handle backing the event log and token cache.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Any>,
}

impl DbManager {
    /// Connect, sign in (remote endpoints), select namespace and
    /// database, then bring the schema up to date.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = any::connect(config.url.as_str()).await?;

        if !config.is_embedded() {
            db.signin(Root {
                username: config.username.clone(),
                password: config.password.clone(),
            })
            .await?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        run_migrations(&db).await?;

        info!("SurrealDB ready");

        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Any> {
        &self.db
    }
}
