//! SurrealDB implementations of the core storage traits.

mod event;
mod token;

pub use event::SurrealEventStore;
pub use token::SurrealTokenCache;
