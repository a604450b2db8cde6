//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `LeaseStore` - Atomic set-if-absent with TTL for idempotency leases
//! - `WebhookDispatcher` - Destination for verified webhook deliveries

mod lease_store;
mod webhook_dispatcher;

pub use lease_store::{LeaseAcquisition, LeaseStore, LeaseStoreError};
pub use webhook_dispatcher::{DispatchError, WebhookDispatcher};
