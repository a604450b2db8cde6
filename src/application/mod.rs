//! Application layer - Command handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    IdempotencyGuard, ReceiveSmsWebhookCommand, ReceiveSmsWebhookHandler, ReceiveSmsWebhookResult,
    ReceiveStripeWebhookCommand, ReceiveStripeWebhookHandler, ReceiveStripeWebhookResult,
    WebhookIntakeError,
};
