//! datagate database — event log and credential cache storage.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - SurrealDB implementations of the core storage traits
//!   ([`repository`])
//! - In-memory implementations of the same traits ([`memory`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod memory;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
