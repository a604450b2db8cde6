//! HTTP handlers for webhook endpoints.
//!
//! Handlers take the body as `Bytes` so signatures are checked against
//! exactly what was sent, before any parsing.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, State},
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Response},
};

use crate::application::{
    ReceiveSmsWebhookCommand, ReceiveSmsWebhookHandler, ReceiveStripeWebhookCommand,
    ReceiveStripeWebhookHandler, WebhookIntakeError,
};
use crate::domain::webhooks::{
    StripeSignatureVerifier, TwilioSignatureVerifier, WebhookEnvelope, WebhookError,
};
use crate::ports::WebhookDispatcher;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";
pub const TWILIO_SIGNATURE_HEADER: &str = "x-twilio-signature";
const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

// ════════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for webhook handlers.
///
/// A `None` verifier means the provider's secret is not configured.
#[derive(Clone)]
pub struct WebhookAppState {
    pub stripe: Option<StripeSignatureVerifier>,
    pub twilio: Option<TwilioSignatureVerifier>,
    pub dispatcher: Arc<dyn WebhookDispatcher>,
    /// Externally visible `scheme://host[:port]`, used for Twilio URLs.
    pub public_base_url: Option<String>,
}

impl WebhookAppState {
    pub fn stripe_handler(&self) -> ReceiveStripeWebhookHandler {
        ReceiveStripeWebhookHandler::new(self.stripe.clone(), self.dispatcher.clone())
    }

    pub fn sms_handler(&self) -> ReceiveSmsWebhookHandler {
        ReceiveSmsWebhookHandler::new(self.twilio.clone(), self.dispatcher.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/stripe - Handle Stripe webhook events
pub async fn handle_stripe_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let cmd = ReceiveStripeWebhookCommand {
        envelope: WebhookEnvelope::new(body, header_string(&headers, STRIPE_SIGNATURE_HEADER)),
    };

    state.stripe_handler().handle(cmd).await?;

    Ok(axum::http::StatusCode::OK)
}

/// POST /webhooks/twilio - Handle Twilio messaging callbacks
pub async fn handle_twilio_webhook(
    State(state): State<WebhookAppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let url = canonical_url(state.public_base_url.as_deref(), &headers, &uri)
        .map_err(WebhookIntakeError::from)?;

    let cmd = ReceiveSmsWebhookCommand {
        url,
        envelope: WebhookEnvelope::new(body, header_string(&headers, TWILIO_SIGNATURE_HEADER)),
    };

    state.sms_handler().handle(cmd).await?;

    Ok(axum::http::StatusCode::OK)
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Rebuilds the external URL a provider requested.
///
/// With a configured base URL the request's path and query are appended to
/// it. Otherwise the scheme comes from `X-Forwarded-Proto` (default
/// `https`) and the authority from `Host`.
///
/// # Errors
///
/// Returns `MalformedHeader` when no base URL is configured and the request
/// has no host.
pub fn canonical_url(
    public_base_url: Option<&str>,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<String, WebhookError> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    if let Some(base) = public_base_url {
        return Ok(format!("{}{}", base.trim_end_matches('/'), path_and_query));
    }

    let scheme = headers
        .get(FORWARDED_PROTO_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("https");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .ok_or_else(|| WebhookError::MalformedHeader("missing host".to_string()))?;

    Ok(format!("{}://{}{}", scheme, host, path_and_query))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts intake errors to HTTP responses.
///
/// The body is always empty; the reason is only logged.
pub struct WebhookApiError(WebhookIntakeError);

impl From<WebhookIntakeError> for WebhookApiError {
    fn from(err: WebhookIntakeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        if let WebhookIntakeError::Dispatch(e) = &self.0 {
            tracing::error!(error = %e, "Webhook dispatch failed");
        }
        self.0.status_code().into_response()
    }
}
