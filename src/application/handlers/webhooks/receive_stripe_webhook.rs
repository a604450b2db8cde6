//! ReceiveStripeWebhookHandler - verify then dispatch a Stripe delivery.

use std::sync::Arc;

use crate::domain::webhooks::{StripeEvent, StripeSignatureVerifier, WebhookEnvelope, WebhookError};
use crate::ports::WebhookDispatcher;

use super::WebhookIntakeError;

/// Command carrying one raw Stripe delivery.
#[derive(Debug, Clone)]
pub struct ReceiveStripeWebhookCommand {
    pub envelope: WebhookEnvelope,
}

/// Result of a dispatched Stripe delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveStripeWebhookResult {
    pub event_id: String,
    pub event_type: String,
}

/// Handler for `POST /webhooks/stripe`.
///
/// Holds no verifier when the signing secret is missing; every delivery is
/// then refused as a configuration error.
pub struct ReceiveStripeWebhookHandler {
    verifier: Option<StripeSignatureVerifier>,
    dispatcher: Arc<dyn WebhookDispatcher>,
}

impl ReceiveStripeWebhookHandler {
    pub fn new(verifier: Option<StripeSignatureVerifier>, dispatcher: Arc<dyn WebhookDispatcher>) -> Self {
        Self { verifier, dispatcher }
    }

    pub async fn handle(
        &self,
        cmd: ReceiveStripeWebhookCommand,
    ) -> Result<ReceiveStripeWebhookResult, WebhookIntakeError> {
        let verifier = self.verifier.as_ref().ok_or_else(|| {
            tracing::error!(provider = "stripe", "Webhook secret not configured, refusing delivery");
            WebhookError::MissingSecret("stripe")
        })?;

        if let Err(e) = verifier.verify(&cmd.envelope) {
            tracing::warn!(provider = "stripe", reason = e.reason(), "Webhook signature rejected");
            return Err(e.into());
        }

        let event = StripeEvent::from_payload(cmd.envelope.body()).map_err(|e| {
            tracing::warn!(provider = "stripe", reason = e.reason(), "Verified webhook body unreadable");
            e
        })?;

        let result = ReceiveStripeWebhookResult {
            event_id: event.id.clone(),
            event_type: event.event_type.clone(),
        };
        self.dispatcher.stripe_event(event).await?;
        Ok(result)
    }
}
