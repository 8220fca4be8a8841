//! Server configuration.

use std::path::PathBuf;

use datagate_auth::AuthConfig;
use datagate_db::DbConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the TOML configuration file.
pub const CONFIG_ENV: &str = "DATAGATE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub database: DbConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: "datagate=info".into(),
            database: DbConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ServerConfig {
    /// Load from the file named by `DATAGATE_CONFIG`, or defaults when
    /// the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ServerConfig::parse("").unwrap();
        assert_eq!(config.log_filter, "datagate=info");
        assert_eq!(config.database.namespace, "datagate");
        assert_eq!(config.auth.credential_bytes, 32);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ServerConfig::parse(
            r#"
            log_filter = "datagate=debug"

            [database]
            url = "mem://"

            [auth]
            credential_prefix = "dg_"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "datagate=debug");
        assert!(config.database.is_embedded());
        assert_eq!(config.database.database, "main");
        assert_eq!(config.auth.credential_prefix, "dg_");
        assert_eq!(config.auth.credential_bytes, 32);
    }

    #[test]
    fn unreadable_file_is_reported() {
        let err = ServerConfig::from_file(PathBuf::from("/nonexistent/datagate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
