//! HTTP adapters - REST API implementations.
//!
//! Each concern has its own HTTP adapter for endpoint exposure; `router`
//! assembles them behind the shared middleware stack.

pub mod events;
pub mod health;
pub mod middleware;
pub mod router;
pub mod webhooks;

// Re-export key types for convenience
pub use health::HealthState;
pub use router::{app_router, AppServices};
pub use webhooks::{webhook_routes, WebhookAppState};
