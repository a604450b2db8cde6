//! Webhook intake handlers.
//!
//! Each handler verifies the delivery's signature over the raw body and
//! only then parses and dispatches it. A rejected delivery causes no side
//! effects.

mod errors;
mod receive_sms_webhook;
mod receive_stripe_webhook;

pub use errors::WebhookIntakeError;
pub use receive_sms_webhook::{
    ReceiveSmsWebhookCommand, ReceiveSmsWebhookHandler, ReceiveSmsWebhookResult,
};
pub use receive_stripe_webhook::{
    ReceiveStripeWebhookCommand, ReceiveStripeWebhookHandler, ReceiveStripeWebhookResult,
};
