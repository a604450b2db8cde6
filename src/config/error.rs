//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid host/port combination: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid body timeout")]
    InvalidBodyTimeout,

    #[error("Invalid request id header name: {0}")]
    InvalidHeaderName(String),

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Lease store timeout must be greater than zero")]
    InvalidLeaseStoreTimeout,

    #[error("Idempotency TTL must be greater than zero")]
    InvalidIdempotencyTtl,

    #[error("Idempotency key prefix must not be empty")]
    EmptyKeyPrefix,

    #[error("Unknown HTTP method in mutating set: {0}")]
    InvalidMethod(String),

    #[error("Signature tolerance window must be greater than zero")]
    InvalidTolerance,

    #[error("Public base URL must be an absolute http(s) URL")]
    InvalidPublicBaseUrl,
}
