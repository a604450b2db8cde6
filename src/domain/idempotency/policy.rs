//! IdempotencyPolicy - which requests are guarded, and how.

use axum::http::Method;
use std::time::Duration;

use super::LeaseKey;

/// Rules applied by the idempotency guard.
///
/// Idempotency is opt-in per request: a guarded method without a key is let
/// through, so a client that omits the header gets no duplicate protection.
#[derive(Debug, Clone)]
pub struct IdempotencyPolicy {
    methods: Vec<Method>,
    ttl: Duration,
    key_prefix: String,
    scope_by_route: bool,
    max_key_length: usize,
}

impl IdempotencyPolicy {
    pub fn new(methods: Vec<Method>, ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self {
            methods,
            ttl,
            key_prefix: key_prefix.into(),
            scope_by_route: false,
            max_key_length: 255,
        }
    }

    /// Includes method and route path in every lease key.
    pub fn with_route_scope(mut self, scope_by_route: bool) -> Self {
        self.scope_by_route = scope_by_route;
        self
    }

    pub fn with_max_key_length(mut self, max_key_length: usize) -> Self {
        self.max_key_length = max_key_length;
        self
    }

    /// Returns true if requests with this method are guarded.
    pub fn applies_to(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_key_length(&self) -> usize {
        self.max_key_length
    }

    /// Builds the store key for a client key on the given route.
    pub fn lease_key(&self, method: &Method, path: &str, client_key: &str) -> LeaseKey {
        if self.scope_by_route {
            LeaseKey::scoped(&self.key_prefix, method.as_str(), path, client_key)
        } else {
            LeaseKey::global(&self.key_prefix, client_key)
        }
    }
}

impl Default for IdempotencyPolicy {
    fn default() -> Self {
        Self::new(
            vec![Method::POST, Method::PUT, Method::PATCH, Method::DELETE],
            Duration::from_secs(600),
            "idem:",
        )
    }
}
