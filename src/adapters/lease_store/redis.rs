//! Redis-backed lease store for multi-instance deployments.
//!
//! Acquisition is a single `SET key 1 NX PX <ttl>`: Redis creates the key
//! only if absent and attaches the expiry in the same command, so there is
//! no window between "check" and "set".

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::ports::{LeaseAcquisition, LeaseStore, LeaseStoreError};

/// Value stored under every lease key.
const LEASE_SENTINEL: &str = "1";

/// Redis lease store.
///
/// Connects lazily and caches one multiplexed connection. Any failed or
/// timed-out round trip drops the cached connection so the next call
/// reconnects. Every round trip, connect included, is bounded by `timeout`.
pub struct RedisLeaseStore {
    client: redis::Client,
    conn: RwLock<Option<MultiplexedConnection>>,
    timeout: Duration,
}

impl RedisLeaseStore {
    /// Create a store for the given `redis://` or `rediss://` URL.
    ///
    /// No connection is made until the first call.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, LeaseStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e: redis::RedisError| LeaseStoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            conn: RwLock::new(None),
            timeout,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, LeaseStoreError> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut cached = self.conn.write().await;
        if let Some(conn) = cached.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e: redis::RedisError| LeaseStoreError::Unavailable(e.to_string()))?;
        *cached = Some(conn.clone());
        Ok(conn)
    }

    /// Runs one command with the configured bound.
    async fn bounded<T, F, Fut>(&self, op: F) -> Result<T, LeaseStoreError>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = redis::RedisResult<T>>,
    {
        let attempt = async {
            let conn = self.connection().await?;
            op(conn)
                .await
                .map_err(|e: redis::RedisError| LeaseStoreError::Unavailable(e.to_string()))
        };

        let result = match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(LeaseStoreError::Timeout(self.timeout)),
        };

        if result.is_err() {
            *self.conn.write().await = None;
        }
        result
    }
}

#[async_trait]
impl LeaseStore for RedisLeaseStore {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<LeaseAcquisition, LeaseStoreError> {
        let key = key.to_string();
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        // SET NX replies OK when written and nil when the key exists
        let reply: Option<String> = self
            .bounded(move |mut conn| async move {
                redis::cmd("SET")
                    .arg(&key)
                    .arg(LEASE_SENTINEL)
                    .arg("NX")
                    .arg("PX")
                    .arg(ttl_ms)
                    .query_async(&mut conn)
                    .await
            })
            .await?;

        Ok(match reply {
            Some(_) => LeaseAcquisition::Acquired,
            None => LeaseAcquisition::AlreadyHeld,
        })
    }

    async fn ping(&self) -> Result<(), LeaseStoreError> {
        let _: String = self
            .bounded(|mut conn| async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisLeaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLeaseStore")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
