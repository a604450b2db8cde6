//! Idempotency middleware for axum.
//!
//! Runs the `IdempotencyGuard` before the route handler. A request is either
//! forwarded with `next.run` or answered here with an empty body:
//!
//! - `409 Conflict` when the key was already used within the TTL
//! - `400 Bad Request` when the key is longer than allowed
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post, middleware};
//!
//! let state = IdempotencyState::new(guard, HeaderName::from_static("idempotency-key"));
//!
//! let app = Router::new()
//!     .route("/api/events", post(handler))
//!     .layer(middleware::from_fn_with_state(state, idempotency_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::IdempotencyGuard;
use crate::domain::idempotency::GuardOutcome;

/// Idempotency middleware state.
#[derive(Clone)]
pub struct IdempotencyState {
    guard: Arc<IdempotencyGuard>,
    header: HeaderName,
}

impl IdempotencyState {
    pub fn new(guard: Arc<IdempotencyGuard>, header: HeaderName) -> Self {
        Self { guard, header }
    }
}

/// Idempotency middleware.
///
/// The header value is used byte-for-byte (non-UTF-8 bytes are replaced
/// lossily) so distinct keys never collapse into one lease.
pub async fn idempotency_middleware(
    State(state): State<IdempotencyState>,
    request: Request,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get(&state.header)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let outcome = state
        .guard
        .check(request.method(), key.as_deref(), request.uri().path())
        .await;

    match outcome {
        GuardOutcome::Proceed(_) => next.run(request).await,
        GuardOutcome::Reject(rejection) => rejection.status_code().into_response(),
    }
}
