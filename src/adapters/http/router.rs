//! Application router assembly.
//!
//! Layer order, outermost first: request id, CORS, trace, request timeout,
//! body timeout, body limit, idempotency guard, routes.
//!
//! The guard is a route layer: a request whose path matches no route (404)
//! never reaches it and never takes a lease.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use super::events::events_routes;
use super::health::{health_routes, HealthState};
use super::middleware::{idempotency_middleware, IdempotencyState, MakeRequestUuid};
use super::webhooks::{webhook_routes, WebhookAppState};
use crate::application::IdempotencyGuard;
use crate::config::{AppConfig, ValidationError};
use crate::domain::webhooks::{StripeSignatureVerifier, TwilioSignatureVerifier};
use crate::ports::{LeaseStore, WebhookDispatcher};

/// Runtime dependencies injected into the router.
#[derive(Clone)]
pub struct AppServices {
    /// `None` runs the idempotency guard without a store (every keyed
    /// request proceeds).
    pub lease_store: Option<Arc<dyn LeaseStore>>,
    pub dispatcher: Arc<dyn WebhookDispatcher>,
}

/// Build the complete application router.
///
/// # Routes
/// - `GET /health`, `GET /ready`
/// - `POST /api/events`, `GET /api/events/:event_id/stats`
/// - `POST /webhooks/stripe`, `POST /webhooks/twilio`
///
/// # Errors
///
/// Returns `ValidationError` for header names or methods that do not parse.
pub fn app_router(config: &AppConfig, services: AppServices) -> Result<Router, ValidationError> {
    let idempotency_header = header_name(&config.idempotency.header_name)?;
    let request_id_header = header_name(&config.server.request_id_header)?;

    let guard = Arc::new(IdempotencyGuard::new(
        services.lease_store.clone(),
        config.idempotency.policy()?,
    ));

    let webhook_state = WebhookAppState {
        stripe: StripeSignatureVerifier::new(config.webhooks.stripe_secret())
            .ok()
            .map(|v| v.with_tolerance(config.webhooks.tolerance())),
        twilio: TwilioSignatureVerifier::new(config.webhooks.twilio_token()).ok(),
        dispatcher: services.dispatcher,
        public_base_url: config.webhooks.public_base_url.clone(),
    };

    let health_state = HealthState {
        lease_store: services.lease_store,
    };

    let mut router = Router::new()
        .merge(health_routes().with_state(health_state))
        .nest("/api", events_routes())
        .nest("/webhooks", webhook_routes().with_state(webhook_state))
        .route_layer(middleware::from_fn_with_state(
            IdempotencyState::new(guard, idempotency_header),
            idempotency_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(RequestBodyTimeoutLayer::new(config.server.body_timeout()))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&config.server.cors_origins_list()) {
        router = router.layer(cors);
    }

    Ok(router
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid)))
}

fn header_name(name: &str) -> Result<HeaderName, ValidationError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ValidationError::InvalidHeaderName(name.to_string()))
}

/// Build a CorsLayer for the configured origins; `None` when there are none.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    Some(layer.allow_origin(origins))
}
