//! Event API HTTP adapter.
//!
//! Placeholder business endpoints behind the idempotency guard.

mod handlers;
mod routes;

pub use handlers::{create_event, get_event_stats, CreateEventResponse, EventStatsResponse};
pub use routes::events_routes;
