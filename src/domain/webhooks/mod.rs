//! Webhook domain module.
//!
//! Authenticates inbound provider deliveries before anything reads them.
//!
//! # Module Structure
//!
//! - `envelope` - Raw delivery bytes plus signature header
//! - `errors` - Verification failures and their HTTP mapping
//! - `stripe` - `Stripe-Signature` (HMAC-SHA256, timestamped)
//! - `twilio` - `X-Twilio-Signature` (HMAC-SHA1 over URL and parameters)
//! - `sms` - Inbound message keywords and delivery classification

mod envelope;
mod errors;
mod sms;
mod stripe;
mod twilio;

pub use envelope::WebhookEnvelope;
pub use errors::WebhookError;
pub use sms::{InboundSms, SmsKeyword, TwilioDelivery};
pub use stripe::{SignatureHeader, StripeEvent, StripeSignatureVerifier, DEFAULT_TOLERANCE};
pub use twilio::TwilioSignatureVerifier;

#[cfg(test)]
pub(crate) use stripe::sign_for_test as sign_stripe_for_test;
