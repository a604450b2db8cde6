//! Webhook provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Webhook provider configuration (Stripe, Twilio)
///
/// Secrets are optional at load time. A provider without a secret keeps its
/// route mounted but every delivery to it fails with a configuration error.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<SecretString>,

    /// Twilio auth token used as the HMAC key
    pub twilio_auth_token: Option<SecretString>,

    /// Maximum accepted age of a signed timestamp, in seconds
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: u64,

    /// Externally visible base URL (scheme://host[:port]) used to rebuild
    /// the URL a provider signed
    pub public_base_url: Option<String>,
}

impl WebhookConfig {
    /// Get the tolerance window as Duration
    pub fn tolerance(&self) -> Duration {
        Duration::from_secs(self.tolerance_secs)
    }

    /// Stripe secret, when configured and non-empty
    pub fn stripe_secret(&self) -> Option<&SecretString> {
        non_empty(self.stripe_webhook_secret.as_ref())
    }

    /// Twilio auth token, when configured and non-empty
    pub fn twilio_token(&self) -> Option<&SecretString> {
        non_empty(self.twilio_auth_token.as_ref())
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tolerance_secs == 0 {
            return Err(ValidationError::InvalidTolerance);
        }
        if let Some(base) = &self.public_base_url {
            let parsed = url::Url::parse(base).map_err(|_| ValidationError::InvalidPublicBaseUrl)?;
            if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
                return Err(ValidationError::InvalidPublicBaseUrl);
            }
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            stripe_webhook_secret: None,
            twilio_auth_token: None,
            tolerance_secs: default_tolerance_secs(),
            public_base_url: None,
        }
    }
}

fn non_empty(secret: Option<&SecretString>) -> Option<&SecretString> {
    secret.filter(|s| !s.expose_secret().is_empty())
}

fn default_tolerance_secs() -> u64 {
    300
}
