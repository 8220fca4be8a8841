//! datagate — gateway entry point.
//!
//! Startup check: loads configuration, validates the scope catalog,
//! brings the event log and token cache schema up to date and assembles
//! the gateway service over them. Exits non-zero if any step fails.

mod config;

use std::process::ExitCode;

use datagate_auth::GatewayService;
use datagate_core::{FieldFilter, GatewayError, ScopeCatalog};
use datagate_db::repository::{SurrealEventStore, SurrealTokenCache};
use datagate_db::{DbError, DbManager};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Debug, Error)]
enum StartupError {
    #[error("scope catalog: {0}")]
    Catalog(#[from] GatewayError),

    #[error("database: {0}")]
    Database(#[from] DbError),
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let catalog = ScopeCatalog::standard()?;
    for provider in catalog.providers() {
        let scopes = catalog
            .registry(provider)
            .map(|r| r.scopes().count())
            .unwrap_or(0);
        info!(%provider, scopes, "Scope registry loaded");
    }

    let db = DbManager::connect(&config.database).await?;

    let service = GatewayService::new(
        SurrealEventStore::new(db.client().clone()),
        SurrealTokenCache::new(db.client().clone()),
        FieldFilter::new(catalog),
        config.auth,
    );
    info!(
        providers = service.filter().catalog().providers().count(),
        "Gateway service assembled"
    );

    info!("datagate startup checks passed");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("datagate: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting datagate...");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use datagate_db::DbConfig;

    use super::*;

    #[tokio::test]
    async fn startup_succeeds_on_embedded_store() {
        let config = ServerConfig {
            database: DbConfig {
                url: "mem://".into(),
                ..DbConfig::default()
            },
            ..ServerConfig::default()
        };

        run(config).await.unwrap();
    }
}
