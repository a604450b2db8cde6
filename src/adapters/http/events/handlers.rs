//! HTTP handlers for event endpoints.

use axum::{extract::Path, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct EventStatsResponse {
    pub event_id: String,
    pub sales: u64,
}

/// POST /api/events
pub async fn create_event() -> (StatusCode, Json<CreateEventResponse>) {
    (StatusCode::CREATED, Json(CreateEventResponse { ok: true }))
}

/// GET /api/events/:event_id/stats
pub async fn get_event_stats(Path(event_id): Path<String>) -> Json<EventStatsResponse> {
    Json(EventStatsResponse { event_id, sales: 0 })
}
