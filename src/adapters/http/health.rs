//! Liveness and readiness endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::ports::LeaseStore;

/// State for the readiness probe.
#[derive(Clone, Default)]
pub struct HealthState {
    pub lease_store: Option<Arc<dyn LeaseStore>>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    /// "ok", "unconfigured" or "unavailable".
    pub lease_store: &'static str,
}

/// GET /health - process is up
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /ready - lease store reachable (or deliberately absent)
///
/// An unreachable store makes the instance unready even though requests
/// would still be served fail-open.
pub async fn ready(State(state): State<HealthState>) -> (StatusCode, Json<ReadyResponse>) {
    let Some(store) = &state.lease_store else {
        return (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                lease_store: "unconfigured",
            }),
        );
    };

    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                lease_store: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    lease_store: "unavailable",
                }),
            )
        }
    }
}

/// Create the health router.
///
/// # Routes
/// - `GET /health`
/// - `GET /ready`
pub fn health_routes() -> Router<HealthState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}
