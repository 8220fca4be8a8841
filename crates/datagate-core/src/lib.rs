//! datagate core: the application aggregate, the provider scope
//! catalog and the field filter that sits between upstream registries
//! and client applications.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod models;
pub mod repository;

pub use aggregate::{Application, CreateApplication};
pub use catalog::{ScopeCatalog, ScopeRegistry};
pub use error::{GatewayError, GatewayResult};
pub use filter::FieldFilter;
