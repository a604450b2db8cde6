//! Webhook HTTP adapter.
//!
//! Exposes provider callback endpoints. Routes carry no user
//! authentication; each delivery is authenticated by its signature.

mod handlers;
mod routes;

pub use handlers::{
    canonical_url, handle_stripe_webhook, handle_twilio_webhook, WebhookApiError, WebhookAppState,
    STRIPE_SIGNATURE_HEADER, TWILIO_SIGNATURE_HEADER,
};
pub use routes::webhook_routes;
