//! Twilio request signature verification.
//!
//! Twilio signs the full URL it called followed by every POST parameter,
//! sorted by name, with each name and value concatenated:
//!
//! ```text
//! X-Twilio-Signature = base64(HMAC-SHA1(auth_token, url ‖ k1 ‖ v1 ‖ k2 ‖ v2 ...))
//! ```
//!
//! JSON deliveries carry a `bodySHA256` query parameter instead; the
//! signature then covers the URL alone and the body must hash to it.

use std::collections::{BTreeMap, BTreeSet};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::envelope::{constant_time_compare, WebhookEnvelope};
use super::errors::WebhookError;

type HmacSha1 = Hmac<Sha1>;

/// Query parameter carrying the hex SHA-256 of a JSON body.
const BODY_HASH_PARAM: &str = "bodySHA256";

/// Verifier for `X-Twilio-Signature`.
#[derive(Clone)]
pub struct TwilioSignatureVerifier {
    auth_token: SecretString,
}

impl TwilioSignatureVerifier {
    /// Creates a verifier keyed by the account auth token.
    ///
    /// # Errors
    ///
    /// Returns `MissingSecret` when the token is absent or empty.
    pub fn new(auth_token: Option<&SecretString>) -> Result<Self, WebhookError> {
        let auth_token = auth_token
            .filter(|s| !s.expose_secret().is_empty())
            .ok_or(WebhookError::MissingSecret("twilio"))?;

        Ok(Self {
            auth_token: auth_token.clone(),
        })
    }

    /// Verifies a delivery against the external URL Twilio requested.
    ///
    /// `url` must be the URL exactly as the sender saw it, including query
    /// string. If it does not match as given, the same URL with the default
    /// port added or removed is tried, since proxies commonly rewrite it.
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` - header missing or not base64
    /// - `SignatureMismatch` - no URL variant produces the signature
    /// - `BodyHashMismatch` - signature valid but body differs from `bodySHA256`
    pub fn verify(&self, url: &str, envelope: &WebhookEnvelope) -> Result<(), WebhookError> {
        let provided = BASE64
            .decode(envelope.signature()?)
            .map_err(|_| WebhookError::MalformedHeader("signature is not base64".to_string()))?;

        let body_hash = body_hash_param(url);
        let params = match body_hash {
            Some(_) => BTreeMap::new(),
            None => form_params(envelope.body()),
        };

        let mut matched = constant_time_compare(&self.compute_signature(url, &params), &provided);
        if !matched {
            if let Some(variant) = toggle_default_port(url) {
                matched = constant_time_compare(&self.compute_signature(&variant, &params), &provided);
            }
        }
        if !matched {
            return Err(WebhookError::SignatureMismatch);
        }

        if let Some(expected) = body_hash {
            let actual = hex::encode(Sha256::digest(envelope.body()));
            if !constant_time_compare(actual.as_bytes(), expected.to_ascii_lowercase().as_bytes()) {
                return Err(WebhookError::BodyHashMismatch);
            }
        }

        Ok(())
    }

    fn compute_signature(&self, url: &str, params: &BTreeMap<String, BTreeSet<String>>) -> Vec<u8> {
        let mut mac = HmacSha1::new_from_slice(self.auth_token.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(url.as_bytes());
        for (key, values) in params {
            for value in values {
                mac.update(key.as_bytes());
                mac.update(value.as_bytes());
            }
        }
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for TwilioSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSignatureVerifier").finish_non_exhaustive()
    }
}

/// Decodes a form-urlencoded body into sorted keys with sorted values.
pub(crate) fn form_params(body: &[u8]) -> BTreeMap<String, BTreeSet<String>> {
    let mut params: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        params
            .entry(key.into_owned())
            .or_default()
            .insert(value.into_owned());
    }
    params
}

fn body_hash_param(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == BODY_HASH_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Returns `url` with its port removed, or the scheme's default port added
/// when none is present. `None` for schemes other than http(s).
///
/// Works on the raw string; re-serializing through a URL parser would
/// normalize away the very port being toggled.
fn toggle_default_port(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let default_port = match scheme.to_ascii_lowercase().as_str() {
        "https" => 443,
        "http" => 80,
        _ => return None,
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let host_start = authority.rfind('@').map_or(0, |i| i + 1);
    let (userinfo, host_port) = authority.split_at(host_start);

    // Skip past an IPv6 literal before looking for the port colon
    let search_from = host_port.rfind(']').map_or(0, |i| i + 1);
    let host_port = match host_port[search_from..].rfind(':') {
        Some(i) => host_port[..search_from + i].to_string(),
        None => format!("{}:{}", host_port, default_port),
    };

    Some(format!("{}://{}{}{}", scheme, userinfo, host_port, tail))
}
