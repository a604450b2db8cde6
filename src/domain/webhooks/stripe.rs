//! Stripe webhook signature verification.
//!
//! Implements verification of `Stripe-Signature` headers using HMAC-SHA256
//! over `"<timestamp>.<raw body>"`, with timestamp validation to limit
//! replay.

use std::time::Duration;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;

use super::envelope::{constant_time_compare, WebhookEnvelope};
use super::errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum age for signed deliveries (5 minutes).
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Maximum allowed clock skew for future timestamps (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// Every v1 signature (HMAC-SHA256) present; more than one appears
    /// while a secret is being rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedHeader` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::MalformedHeader("invalid header format".to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::MalformedHeader("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::MalformedHeader("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {
                    // v0 and unknown schemes are ignored
                }
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| WebhookError::MalformedHeader("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::MalformedHeader(
                "missing v1 signature".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
#[derive(Clone)]
pub struct StripeSignatureVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: SecretString,
    /// Maximum accepted signature age.
    tolerance: Duration,
}

impl StripeSignatureVerifier {
    /// Creates a verifier with the default 5 minute tolerance.
    ///
    /// # Errors
    ///
    /// Returns `MissingSecret` when no secret is given or it is empty, so a
    /// route without a secret can never accept a delivery.
    pub fn new(secret: Option<&SecretString>) -> Result<Self, WebhookError> {
        let secret = secret
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or(WebhookError::MissingSecret("stripe"))?;

        Ok(Self {
            secret: secret.clone(),
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// Overrides the timestamp tolerance window.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Verifies the delivery in `envelope` against its arrival time.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Compute expected signature over the raw body bytes
    /// 3. Compare against every v1 candidate in constant time
    /// 4. Validate the signed timestamp against the tolerance window
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` - header missing or unparseable
    /// - `SignatureMismatch` - no candidate matches
    /// - `TimestampOutOfRange` - signature is authentic but too old
    /// - `TimestampInFuture` - timestamp beyond clock skew tolerance
    pub fn verify(&self, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(envelope.signature()?)?;
        self.verify_at(envelope.body(), &header, envelope.arrived_at().timestamp())
    }

    /// Verifies a parsed header against `payload` as of unix time `now`.
    pub fn verify_at(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
        now: i64,
    ) -> Result<(), WebhookError> {
        let expected = self.compute_signature(header.timestamp, payload);

        let matched = header
            .v1_signatures
            .iter()
            .fold(false, |found, candidate| {
                constant_time_compare(&expected, candidate) | found
            });
        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        self.validate_timestamp(header.timestamp, now)
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let age = now.saturating_sub(timestamp);
        let tolerance = i64::try_from(self.tolerance.as_secs()).unwrap_or(i64::MAX);

        if age > tolerance {
            return Err(WebhookError::TimestampOutOfRange);
        }

        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::TimestampInFuture);
        }

        Ok(())
    }

    /// Computes HMAC-SHA256 over `"<timestamp>."` followed by the raw payload.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for StripeSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeSignatureVerifier")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

/// Stripe webhook event (minimal).
///
/// Only the envelope fields are captured; `data` is kept opaque for the
/// dispatcher.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Whether this is a live mode event.
    #[serde(default)]
    pub livemode: bool,

    /// Event-specific data.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl StripeEvent {
    /// Parses a verified payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` when the body is not a Stripe event object.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }
}

/// Builds a `Stripe-Signature` header value for test fixtures.
#[cfg(test)]
pub(crate) fn sign_for_test(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use chrono::{DateTime, Utc};

    const TEST_SECRET: &str = "whsec_test_secret";
    const VECTOR_TIMESTAMP: i64 = 1_704_067_200;
    const VECTOR_BODY: &str =
        r#"{"id":"evt_test123","object":"event","type":"payment_intent.succeeded"}"#;
    const VECTOR_SIGNATURE: &str =
        "a3bdbf5f93aac774dff2cb968edb79c5b9abd023890db0378a88440dd55d04a3";

    fn verifier() -> StripeSignatureVerifier {
        StripeSignatureVerifier::new(Some(&SecretString::new(TEST_SECRET.to_string()))).unwrap()
    }

    fn envelope_at(body: &[u8], header: &str, now: i64) -> WebhookEnvelope {
        WebhookEnvelope::with_arrival(
            Bytes::copy_from_slice(body),
            Some(header.to_string()),
            DateTime::<Utc>::from_timestamp(now, 0).unwrap(),
        )
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1_only() {
        let signature = "a".repeat(64);
        let header = SignatureHeader::parse(&format!("t=1234567890,v1={}", signature)).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_multiple_v1() {
        let header_str = format!("t=1,v1={},v1={},v0={}", "a".repeat(64), "b".repeat(64), "c".repeat(64));
        let header = SignatureHeader::parse(&header_str).unwrap();
        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_header_ignores_unknown_fields() {
        let header_str = format!("t=1234567890,v1={},v2=future,scheme=hmac", "a".repeat(64));
        let header = SignatureHeader::parse(&header_str).unwrap();
        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_tolerates_whitespace() {
        let header_str = format!("t = 1234567890 , v1 = {}", "a".repeat(64));
        assert!(SignatureHeader::parse(&header_str).is_ok());
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_invalid_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("t=not_a_number,v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_invalid_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_valid_hex");
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_no_equals_fails() {
        let result = SignatureHeader::parse("t1234567890");
        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Secret Handling Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn absent_secret_is_configuration_error() {
        let result = StripeSignatureVerifier::new(None);
        assert!(matches!(result, Err(WebhookError::MissingSecret("stripe"))));
    }

    #[test]
    fn empty_secret_is_configuration_error() {
        let empty = SecretString::new(String::new());
        let err = StripeSignatureVerifier::new(Some(&empty)).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(!err.is_invalid_signature());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let debug = format!("{:?}", verifier());
        assert!(!debug.contains(TEST_SECRET));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn known_vector_is_valid() {
        let header = format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE);
        let envelope = envelope_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 10);

        assert!(verifier().verify(&envelope).is_ok());
    }

    #[test]
    fn test_signer_matches_known_vector() {
        let header = sign_for_test(TEST_SECRET, VECTOR_TIMESTAMP, VECTOR_BODY.as_bytes());
        assert_eq!(header, format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE));
    }

    #[test]
    fn flipping_one_body_byte_is_invalid() {
        let header = format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE);
        let mut tampered = VECTOR_BODY.as_bytes().to_vec();
        tampered[10] ^= 0x01;
        let envelope = envelope_at(&tampered, &header, VECTOR_TIMESTAMP);

        assert!(matches!(
            verifier().verify(&envelope),
            Err(WebhookError::SignatureMismatch)
        ));
    }

    #[test]
    fn reserialized_body_is_invalid() {
        // Same JSON value, different bytes
        let header = format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE);
        let value: serde_json::Value = serde_json::from_str(VECTOR_BODY).unwrap();
        let pretty = serde_json::to_vec_pretty(&value).unwrap();
        let envelope = envelope_at(&pretty, &header, VECTOR_TIMESTAMP);

        assert!(matches!(
            verifier().verify(&envelope),
            Err(WebhookError::SignatureMismatch)
        ));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let other = StripeSignatureVerifier::new(Some(&SecretString::new("whsec_other".to_string())))
            .unwrap();
        let header = format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE);
        let envelope = envelope_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP);

        assert!(matches!(
            other.verify(&envelope),
            Err(WebhookError::SignatureMismatch)
        ));
    }

    #[test]
    fn any_matching_v1_candidate_is_accepted() {
        let header = format!(
            "t={},v1={},v1={}",
            VECTOR_TIMESTAMP,
            "0".repeat(64),
            VECTOR_SIGNATURE
        );
        let envelope = envelope_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP);

        assert!(verifier().verify(&envelope).is_ok());
    }

    #[test]
    fn non_utf8_body_is_signed_as_raw_bytes() {
        let body: &[u8] = &[0xff, 0xfe, 0x00, b'{', 0x80];
        let now = Utc::now().timestamp();
        let header = sign_for_test(TEST_SECRET, now, body);
        let envelope = envelope_at(body, &header, now);

        assert!(verifier().verify(&envelope).is_ok());
    }

    #[test]
    fn missing_header_is_malformed() {
        let envelope = WebhookEnvelope::new(Bytes::from_static(b"{}"), None);
        assert!(matches!(
            verifier().verify(&envelope),
            Err(WebhookError::MalformedHeader(_))
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp Validation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn timestamp_within_range_succeeds() {
        let header = SignatureHeader::parse(&format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE))
            .unwrap();
        let result = verifier().verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 120);
        assert!(result.is_ok());
    }

    #[test]
    fn correct_signature_with_stale_timestamp_is_invalid() {
        let header = format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE);
        let envelope = envelope_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 600);

        let err = verifier().verify(&envelope).unwrap_err();
        assert!(matches!(err, WebhookError::TimestampOutOfRange));
        assert!(err.is_invalid_signature());
    }

    #[test]
    fn timestamp_at_boundary_succeeds() {
        let header = SignatureHeader::parse(&format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE))
            .unwrap();
        let result = verifier().verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 300);
        assert!(result.is_ok());
    }

    #[test]
    fn timestamp_just_past_boundary_fails() {
        let header = SignatureHeader::parse(&format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE))
            .unwrap();
        let result = verifier().verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 301);
        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn custom_tolerance_is_honoured() {
        let header = SignatureHeader::parse(&format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE))
            .unwrap();
        let strict = verifier().with_tolerance(Duration::from_secs(30));

        assert!(strict.verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 30).is_ok());
        assert!(matches!(
            strict.verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP + 31),
            Err(WebhookError::TimestampOutOfRange)
        ));
    }

    #[test]
    fn timestamp_from_future_with_skew_succeeds() {
        let header = SignatureHeader::parse(&format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE))
            .unwrap();
        let result = verifier().verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP - 30);
        assert!(result.is_ok());
    }

    #[test]
    fn timestamp_from_future_beyond_skew_fails() {
        let header = SignatureHeader::parse(&format!("t={},v1={}", VECTOR_TIMESTAMP, VECTOR_SIGNATURE))
            .unwrap();
        let result = verifier().verify_at(VECTOR_BODY.as_bytes(), &header, VECTOR_TIMESTAMP - 120);
        assert!(matches!(result, Err(WebhookError::TimestampInFuture)));
    }

    #[test]
    fn extreme_timestamps_are_out_of_range_without_overflow() {
        let payload = b"{}";
        let now = 1_700_000_000;

        let oldest = SignatureHeader::parse(&sign_for_test(TEST_SECRET, i64::MIN, payload)).unwrap();
        assert!(matches!(
            verifier().verify_at(payload, &oldest, now),
            Err(WebhookError::TimestampOutOfRange)
        ));

        let newest = SignatureHeader::parse(&sign_for_test(TEST_SECRET, i64::MAX, payload)).unwrap();
        assert!(matches!(
            verifier().verify_at(payload, &newest, now),
            Err(WebhookError::TimestampInFuture)
        ));
    }

    #[test]
    fn freshly_signed_delivery_verifies_now() {
        let payload = br#"{"id":"evt_now","type":"charge.succeeded"}"#;
        let header = sign_for_test(TEST_SECRET, Utc::now().timestamp(), payload);
        let envelope = WebhookEnvelope::new(Bytes::from_static(payload), Some(header));

        assert!(verifier().verify(&envelope).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Event Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn event_parses_envelope_fields() {
        let event = StripeEvent::from_payload(VECTOR_BODY.as_bytes()).unwrap();
        assert_eq!(event.id, "evt_test123");
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert!(!event.livemode);
    }

    #[test]
    fn invalid_json_is_invalid_payload() {
        let result = StripeEvent::from_payload(b"not valid json");
        assert!(matches!(result, Err(WebhookError::InvalidPayload(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Robustness
    // ══════════════════════════════════════════════════════════════

    proptest::proptest! {
        #[test]
        fn parse_never_panics(header in ".*") {
            let _ = SignatureHeader::parse(&header);
        }
    }
}
