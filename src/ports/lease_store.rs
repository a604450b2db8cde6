//! Lease store port for idempotency duplicate suppression.
//!
//! A lease records that an idempotency key has been used. The store must
//! offer one primitive: atomically create a key with a TTL only if it does
//! not already exist, in a single round trip. A store that can only do
//! "get then set" cannot implement this port, because two concurrent
//! callers could both observe the key as absent.

use async_trait::async_trait;
use std::time::Duration;

/// Port for acquiring short-lived idempotency leases.
///
/// Implementations must be safe for concurrent use from many request tasks.
/// Expiry is owned by the store; callers never delete or renew a lease.
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Atomically create `key` with the given TTL if it is absent.
    ///
    /// Returns `Acquired` when this call created the lease and `AlreadyHeld`
    /// when a live lease already existed. An existing lease is never
    /// overwritten or extended.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<LeaseAcquisition, LeaseStoreError>;

    /// Round-trip check used by readiness probes.
    async fn ping(&self) -> Result<(), LeaseStoreError>;
}

/// Result of a lease acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseAcquisition {
    /// The lease did not exist and was created by this call.
    Acquired,
    /// A live lease with this key already exists.
    AlreadyHeld,
}

impl LeaseAcquisition {
    /// Returns true if this call created the lease.
    pub fn is_acquired(&self) -> bool {
        matches!(self, LeaseAcquisition::Acquired)
    }
}

/// Errors that can occur talking to the lease store.
#[derive(Debug, thiserror::Error)]
pub enum LeaseStoreError {
    /// Lease store backend is unreachable or returned an error.
    #[error("lease store unavailable: {0}")]
    Unavailable(String),

    /// The round trip did not complete within the configured bound.
    #[error("lease store timed out after {0:?}")]
    Timeout(Duration),
}
