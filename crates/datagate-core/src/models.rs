//! Domain models for datagate.
//!
//! Application state, permission events, credentials and scopes, plus
//! the input/output shapes of each upstream provider.

pub mod application;
pub mod cnaf;
pub mod dgfip;
pub mod event;
pub mod field_path;
pub mod mesri;
pub mod pole_emploi;
pub mod provider;
pub mod scope;
pub mod token;
