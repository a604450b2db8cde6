//! In-memory lease store for testing and development.
//!
//! Not shared between processes, so it only suppresses duplicates that land
//! on the same instance.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::ports::{LeaseAcquisition, LeaseStore, LeaseStoreError};

/// Map size that triggers the first sweep of expired entries.
const PURGE_THRESHOLD: usize = 1024;

/// Lease table plus the size at which the next sweep runs.
///
/// After each sweep the threshold becomes twice the surviving count (never
/// below `PURGE_THRESHOLD`), so a table full of live leases is scanned
/// once per doubling instead of on every acquire.
#[derive(Debug)]
struct LeaseTable {
    /// Lease key -> expiry instant.
    entries: HashMap<String, Instant>,
    sweep_at: usize,
}

impl Default for LeaseTable {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            sweep_at: PURGE_THRESHOLD,
        }
    }
}

impl LeaseTable {
    fn sweep_if_due(&mut self, now: Instant) {
        if self.entries.len() < self.sweep_at {
            return;
        }
        self.entries.retain(|_, expires_at| *expires_at > now);
        self.sweep_at = (self.entries.len() * 2).max(PURGE_THRESHOLD);
    }
}

/// In-memory lease store.
///
/// Check and insert happen under one lock, which makes acquisition atomic
/// across concurrent tasks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaseStore {
    leases: Arc<Mutex<LeaseTable>>,
}

impl InMemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live leases.
    pub async fn live_count(&self) -> usize {
        let now = Instant::now();
        self.leases
            .lock()
            .await
            .entries
            .values()
            .filter(|expires_at| **expires_at > now)
            .count()
    }
}

#[async_trait]
impl LeaseStore for InMemoryLeaseStore {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<LeaseAcquisition, LeaseStoreError> {
        let now = Instant::now();
        let mut table = self.leases.lock().await;
        table.sweep_if_due(now);

        match table.entries.get(key) {
            Some(expires_at) if *expires_at > now => Ok(LeaseAcquisition::AlreadyHeld),
            _ => {
                table.entries.insert(key.to_string(), now + ttl);
                Ok(LeaseAcquisition::Acquired)
            }
        }
    }

    async fn ping(&self) -> Result<(), LeaseStoreError> {
        Ok(())
    }
}
