//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `lease_store` - Idempotency lease stores (in-memory, Redis)
//! - `dispatch` - Destinations for verified webhook deliveries
//! - `http` - axum router, middleware and handlers

pub mod dispatch;
pub mod http;
pub mod lease_store;

pub use dispatch::LoggingDispatcher;
pub use lease_store::{InMemoryLeaseStore, RedisLeaseStore};
