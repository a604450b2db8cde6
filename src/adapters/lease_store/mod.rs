//! Lease store adapters.
//!
//! Implementations of the LeaseStore port for different backends.
//!
//! ## Available Adapters
//!
//! - `InMemoryLeaseStore` - Single process, for testing and development
//! - `RedisLeaseStore` - Redis `SET NX PX`, shared across instances
//!
//! ## Usage
//!
//! ```ignore
//! use ingress_guard::adapters::lease_store::{InMemoryLeaseStore, RedisLeaseStore};
//!
//! // For testing
//! let store = InMemoryLeaseStore::new();
//!
//! // For production
//! let store = RedisLeaseStore::new("redis://127.0.0.1/", Duration::from_millis(500))?;
//! ```

mod in_memory;
mod redis;

pub use self::redis::RedisLeaseStore;
pub use in_memory::InMemoryLeaseStore;
