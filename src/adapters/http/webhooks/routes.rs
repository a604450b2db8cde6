//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_stripe_webhook, handle_twilio_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `POST /stripe` - Stripe events (`Stripe-Signature`)
/// - `POST /twilio` - Twilio messaging callbacks (`X-Twilio-Signature`)
///
/// Both routes stay mounted when their secret is missing and answer 500.
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/stripe", post(handle_stripe_webhook))
        .route("/twilio", post(handle_twilio_webhook))
}
