//! ReceiveSmsWebhookHandler - verify then dispatch an inbound Twilio delivery.

use std::sync::Arc;

use crate::domain::webhooks::{
    SmsKeyword, TwilioDelivery, TwilioSignatureVerifier, WebhookEnvelope, WebhookError,
};
use crate::ports::WebhookDispatcher;

use super::WebhookIntakeError;

/// Command carrying one raw Twilio delivery.
#[derive(Debug, Clone)]
pub struct ReceiveSmsWebhookCommand {
    /// External URL Twilio requested, including query string.
    pub url: String,
    pub envelope: WebhookEnvelope,
}

/// Result of a dispatched delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveSmsWebhookResult {
    /// An inbound message was classified and dispatched.
    Message { message_sid: String, keyword: SmsKeyword },
    /// A non-message delivery was dispatched unparsed.
    Callback,
}

/// Handler for `POST /webhooks/twilio`.
pub struct ReceiveSmsWebhookHandler {
    verifier: Option<TwilioSignatureVerifier>,
    dispatcher: Arc<dyn WebhookDispatcher>,
}

impl ReceiveSmsWebhookHandler {
    pub fn new(verifier: Option<TwilioSignatureVerifier>, dispatcher: Arc<dyn WebhookDispatcher>) -> Self {
        Self { verifier, dispatcher }
    }

    pub async fn handle(
        &self,
        cmd: ReceiveSmsWebhookCommand,
    ) -> Result<ReceiveSmsWebhookResult, WebhookIntakeError> {
        let verifier = self.verifier.as_ref().ok_or_else(|| {
            tracing::error!(provider = "twilio", "Webhook secret not configured, refusing delivery");
            WebhookError::MissingSecret("twilio")
        })?;

        if let Err(e) = verifier.verify(&cmd.url, &cmd.envelope) {
            tracing::warn!(provider = "twilio", reason = e.reason(), "Webhook signature rejected");
            return Err(e.into());
        }

        match TwilioDelivery::from_body(cmd.envelope.raw_body()) {
            TwilioDelivery::Sms(sms) => {
                let result = ReceiveSmsWebhookResult::Message {
                    message_sid: sms.message_sid.clone(),
                    keyword: sms.keyword,
                };
                self.dispatcher.inbound_sms(sms).await?;
                Ok(result)
            }
            TwilioDelivery::Callback(body) => {
                self.dispatcher.twilio_callback(body).await?;
                Ok(ReceiveSmsWebhookResult::Callback)
            }
        }
    }
}
