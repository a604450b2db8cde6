//! Webhook dispatcher port.
//!
//! Receives deliveries only after their signature has been verified.
//! Implementations hold the business reaction to each provider event.

use async_trait::async_trait;
use axum::body::Bytes;

use crate::domain::webhooks::{InboundSms, StripeEvent};

/// Port for handing verified webhook deliveries to business logic.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    /// Handle a verified Stripe event.
    async fn stripe_event(&self, event: StripeEvent) -> Result<(), DispatchError>;

    /// Handle a verified inbound text message.
    async fn inbound_sms(&self, sms: InboundSms) -> Result<(), DispatchError>;

    /// Handle a verified Twilio delivery that is not an inbound message,
    /// such as a JSON body or a status callback. `body` is the raw bytes.
    async fn twilio_callback(&self, body: Bytes) -> Result<(), DispatchError>;
}

/// Errors raised by a dispatcher.
///
/// Surfaced as 500 so the provider redelivers.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch failed: {0}")]
    Failed(String),
}
