//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INGRESS_GUARD` prefix and nested values use double underscores as separators.
//!
//! The resulting [`AppConfig`] is built once at startup and handed to each
//! component; nothing reads settings from a global afterwards.
//!
//! # Example
//!
//! ```no_run
//! use ingress_guard::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod idempotency;
mod lease_store;
mod server;
mod webhooks;

pub use error::{ConfigError, ValidationError};
pub use idempotency::IdempotencyConfig;
pub use lease_store::LeaseStoreConfig;
pub use server::{Environment, ServerConfig};
pub use webhooks::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, timeouts, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Lease store configuration (Redis); optional
    #[serde(default)]
    pub lease_store: LeaseStoreConfig,

    /// Idempotency guard configuration
    #[serde(default)]
    pub idempotency: IdempotencyConfig,

    /// Webhook provider secrets and verification settings
    #[serde(default)]
    pub webhooks: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INGRESS_GUARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INGRESS_GUARD__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `INGRESS_GUARD__LEASE_STORE__URL=...` -> `lease_store.url = ...`
    /// - `INGRESS_GUARD__WEBHOOKS__STRIPE_WEBHOOK_SECRET=...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INGRESS_GUARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Missing provider secrets are deliberately not a validation failure;
    /// see [`AppConfig::missing_secrets`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.lease_store.validate()?;
        self.idempotency.validate()?;
        self.webhooks.validate()?;
        Ok(())
    }

    /// Names of webhook providers whose secret is not configured.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.webhooks.stripe_secret().is_none() {
            missing.push("stripe");
        }
        if self.webhooks.twilio_token().is_none() {
            missing.push("twilio");
        }
        missing
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "INGRESS_GUARD__SERVER__PORT",
        "INGRESS_GUARD__SERVER__ENVIRONMENT",
        "INGRESS_GUARD__LEASE_STORE__URL",
        "INGRESS_GUARD__IDEMPOTENCY__TTL_SECS",
        "INGRESS_GUARD__IDEMPOTENCY__MUTATING_METHODS",
        "INGRESS_GUARD__WEBHOOKS__STRIPE_WEBHOOK_SECRET",
        "INGRESS_GUARD__WEBHOOKS__TWILIO_AUTH_TOKEN",
        "INGRESS_GUARD__WEBHOOKS__TOLERANCE_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_no_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(!config.lease_store.is_configured());
        assert_eq!(config.idempotency.ttl_secs, 600);
        assert_eq!(config.webhooks.tolerance_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("INGRESS_GUARD__SERVER__PORT", "3000");
        env::set_var("INGRESS_GUARD__LEASE_STORE__URL", "redis://localhost:6379");
        env::set_var("INGRESS_GUARD__IDEMPOTENCY__TTL_SECS", "30");
        env::set_var("INGRESS_GUARD__IDEMPOTENCY__MUTATING_METHODS", "POST,DELETE");
        env::set_var("INGRESS_GUARD__WEBHOOKS__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var("INGRESS_GUARD__WEBHOOKS__TOLERANCE_SECS", "120");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.lease_store.url.as_deref(),
            Some("redis://localhost:6379")
        );
        assert_eq!(config.idempotency.ttl_secs, 30);
        assert_eq!(config.idempotency.methods().unwrap().len(), 2);
        assert_eq!(
            config.webhooks.stripe_secret().unwrap().expose_secret(),
            "whsec_xxx"
        );
        assert_eq!(config.webhooks.tolerance_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_secrets_are_reported_not_rejected() {
        let config = AppConfig::default();
        assert_eq!(config.missing_secrets(), vec!["stripe", "twilio"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("INGRESS_GUARD__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_validate_surfaces_section_errors() {
        let mut config = AppConfig::default();
        config.lease_store.url = Some("memcached://localhost".to_string());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRedisUrl)
        ));
    }
}
