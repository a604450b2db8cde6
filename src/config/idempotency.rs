//! Idempotency guard configuration

use http::Method;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::idempotency::IdempotencyPolicy;

/// Idempotency guard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdempotencyConfig {
    /// Request header carrying the client-supplied key
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Lease lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Namespace prefix for lease keys in the shared store
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Methods subject to the guard (comma-separated)
    #[serde(default = "default_mutating_methods")]
    pub mutating_methods: String,

    /// Include method and route path in the lease scope
    #[serde(default)]
    pub scope_by_route: bool,

    /// Longest accepted key, in bytes
    #[serde(default = "default_max_key_length")]
    pub max_key_length: usize,
}

impl IdempotencyConfig {
    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Parse the configured mutating method set.
    pub fn methods(&self) -> Result<Vec<Method>, ValidationError> {
        self.mutating_methods
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(|m| {
                let upper = m.to_ascii_uppercase();
                Method::from_bytes(upper.as_bytes())
                    .map_err(|_| ValidationError::InvalidMethod(m.to_string()))
            })
            .collect()
    }

    /// Build the guard policy from these settings.
    pub fn policy(&self) -> Result<IdempotencyPolicy, ValidationError> {
        Ok(IdempotencyPolicy::new(self.methods()?, self.ttl(), self.key_prefix.clone())
            .with_route_scope(self.scope_by_route)
            .with_max_key_length(self.max_key_length))
    }

    /// Validate idempotency configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if http::HeaderName::from_bytes(self.header_name.as_bytes()).is_err() {
            return Err(ValidationError::InvalidHeaderName(self.header_name.clone()));
        }
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidIdempotencyTtl);
        }
        if self.key_prefix.is_empty() {
            return Err(ValidationError::EmptyKeyPrefix);
        }
        self.methods()?;
        Ok(())
    }
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            ttl_secs: default_ttl_secs(),
            key_prefix: default_key_prefix(),
            mutating_methods: default_mutating_methods(),
            scope_by_route: false,
            max_key_length: default_max_key_length(),
        }
    }
}

fn default_header_name() -> String {
    "Idempotency-Key".to_string()
}

fn default_ttl_secs() -> u64 {
    600
}

fn default_key_prefix() -> String {
    "idem:".to_string()
}

fn default_mutating_methods() -> String {
    "POST,PUT,PATCH,DELETE".to_string()
}

fn default_max_key_length() -> usize {
    255
}
