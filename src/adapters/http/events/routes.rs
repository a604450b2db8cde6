//! Axum router configuration for event endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_event, get_event_stats};

/// Create the events router.
///
/// # Routes
/// - `POST /events` - Create an event (idempotency-guarded)
/// - `GET /events/:event_id/stats` - Sales statistics for an event
pub fn events_routes() -> Router {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/:event_id/stats", get(get_event_stats))
}
