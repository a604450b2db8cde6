//! Immutable view of an inbound webhook delivery.

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

/// Raw webhook delivery as received on the wire.
///
/// Holds the exact body bytes before any parsing, the signature header
/// value, and when the delivery arrived. Verification reads it; nothing
/// mutates it.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    body: Bytes,
    signature: Option<String>,
    received_at: DateTime<Utc>,
}

impl WebhookEnvelope {
    /// Creates an envelope stamped with the current time.
    pub fn new(body: Bytes, signature: Option<String>) -> Self {
        Self::with_arrival(body, signature, Utc::now())
    }

    /// Creates an envelope with an explicit arrival time.
    pub fn with_arrival(body: Bytes, signature: Option<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            body,
            signature,
            received_at,
        }
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Raw body as a shared buffer.
    pub fn raw_body(&self) -> Bytes {
        self.body.clone()
    }

    /// Signature header value.
    ///
    /// # Errors
    ///
    /// Returns `MalformedHeader` when the header was absent or blank.
    pub fn signature(&self) -> Result<&str, WebhookError> {
        self.signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| WebhookError::MalformedHeader("missing signature header".to_string()))
    }

    /// Arrival time.
    pub fn arrived_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// Length is not secret; contents are compared without early exit.
pub(crate) fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
