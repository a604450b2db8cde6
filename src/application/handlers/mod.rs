//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over ports.

pub mod idempotency;
pub mod webhooks;

pub use idempotency::IdempotencyGuard;
pub use webhooks::{
    ReceiveSmsWebhookCommand, ReceiveSmsWebhookHandler, ReceiveSmsWebhookResult,
    ReceiveStripeWebhookCommand, ReceiveStripeWebhookHandler, ReceiveStripeWebhookResult,
    WebhookIntakeError,
};
