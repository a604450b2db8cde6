//! Dispatcher that records verified deliveries through `tracing`.
//!
//! Used when no business handler is wired in; deliveries are acknowledged
//! and logged with identifiers only, never payload contents.

use async_trait::async_trait;
use axum::body::Bytes;

use crate::domain::webhooks::{InboundSms, SmsKeyword, StripeEvent};
use crate::ports::{DispatchError, WebhookDispatcher};

/// Logs each verified delivery and acknowledges it.
#[derive(Debug, Clone, Default)]
pub struct LoggingDispatcher;

impl LoggingDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebhookDispatcher for LoggingDispatcher {
    async fn stripe_event(&self, event: StripeEvent) -> Result<(), DispatchError> {
        tracing::info!(
            provider = "stripe",
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook event received"
        );
        Ok(())
    }

    async fn inbound_sms(&self, sms: InboundSms) -> Result<(), DispatchError> {
        match sms.keyword {
            SmsKeyword::OptOut => {
                tracing::info!(provider = "twilio", message_sid = %sms.message_sid, "SMS opt-out received")
            }
            SmsKeyword::OptIn => {
                tracing::info!(provider = "twilio", message_sid = %sms.message_sid, "SMS opt-in received")
            }
            SmsKeyword::Help => {
                tracing::info!(provider = "twilio", message_sid = %sms.message_sid, "SMS help request received")
            }
            SmsKeyword::Other => {
                tracing::debug!(provider = "twilio", message_sid = %sms.message_sid, "SMS received")
            }
        }
        Ok(())
    }

    async fn twilio_callback(&self, body: Bytes) -> Result<(), DispatchError> {
        tracing::info!(provider = "twilio", body_len = body.len(), "Webhook callback received");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acknowledges_stripe_events() {
        let event = StripeEvent::from_payload(br#"{"id":"evt_1","type":"charge.succeeded"}"#).unwrap();
        assert!(LoggingDispatcher::new().stripe_event(event).await.is_ok());
    }

    #[tokio::test]
    async fn acknowledges_sms() {
        let sms = InboundSms::from_form(b"From=%2B15550001111&Body=STOP").unwrap();
        assert!(LoggingDispatcher::new().inbound_sms(sms).await.is_ok());
    }

    #[tokio::test]
    async fn acknowledges_twilio_callbacks() {
        let body = Bytes::from_static(br#"{"MessageStatus":"sent"}"#);
        assert!(LoggingDispatcher::new().twilio_callback(body).await.is_ok());
    }
}
