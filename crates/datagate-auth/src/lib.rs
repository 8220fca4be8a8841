//! datagate auth — credential issuance and resolution, and the gateway
//! service that ties the event log, the credential cache and upstream
//! providers to the application aggregate.

pub mod config;
pub mod error;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::GatewayService;
pub use token::OpaqueCredentialFactory;
