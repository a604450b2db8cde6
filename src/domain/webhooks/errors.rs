//! Webhook error types for inbound provider deliveries.
//!
//! Separates configuration failures (our side, 5xx) from authentication
//! failures (their side, 4xx). Display strings never include the secret or
//! the signature value the sender supplied.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while authenticating a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signing secret is configured for this provider.
    #[error("Webhook secret not configured for {0}")]
    MissingSecret(&'static str),

    /// Signature header is absent or cannot be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedHeader(String),

    /// No supplied signature matches the expected value.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Signed timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed timestamp is in the future beyond clock skew tolerance.
    #[error("Timestamp in the future")]
    TimestampInFuture,

    /// Body digest does not match the digest carried in the signed URL.
    #[error("Body hash mismatch")]
    BodyHashMismatch,

    /// Verified body could not be parsed as the provider's payload.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// Returns true for server-side configuration problems.
    ///
    /// These are never downgraded to a signature verdict; the delivery
    /// is refused until the secret is configured.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, WebhookError::MissingSecret(_))
    }

    /// Returns true when the delivery failed authentication.
    pub fn is_invalid_signature(&self) -> bool {
        matches!(
            self,
            WebhookError::MalformedHeader(_)
                | WebhookError::SignatureMismatch
                | WebhookError::TimestampOutOfRange
                | WebhookError::TimestampInFuture
                | WebhookError::BodyHashMismatch
        )
    }

    /// Short machine-readable reason, safe to log.
    pub fn reason(&self) -> &'static str {
        match self {
            WebhookError::MissingSecret(_) => "missing_secret",
            WebhookError::MalformedHeader(_) => "malformed",
            WebhookError::SignatureMismatch => "mismatch",
            WebhookError::TimestampOutOfRange => "stale",
            WebhookError::TimestampInFuture => "future",
            WebhookError::BodyHashMismatch => "body_hash_mismatch",
            WebhookError::InvalidPayload(_) => "invalid_payload",
        }
    }

    /// Maps the error to an HTTP status code.
    ///
    /// Providers retry on 5xx, so only configuration problems use it.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSecret(_) => StatusCode::INTERNAL_SERVER_ERROR,

            WebhookError::MalformedHeader(_)
            | WebhookError::SignatureMismatch
            | WebhookError::TimestampOutOfRange
            | WebhookError::TimestampInFuture
            | WebhookError::BodyHashMismatch
            | WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}
