//! Ingress Guard - idempotency and webhook authenticity for HTTP services.
//!
//! Sits in front of business endpoints and provides two guarantees:
//!
//! - Mutating requests that carry the same idempotency key run at most once
//!   within a TTL window, enforced by an atomic lease in a shared store.
//! - Payment and messaging webhooks are authenticated by an HMAC signature
//!   over the raw body before any handler sees them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;

/// Initialize tracing for the service.
///
/// `RUST_LOG` overrides the configured level. Production emits JSON lines;
/// other environments use the human-readable formatter.
pub fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
