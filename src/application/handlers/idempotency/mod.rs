//! Idempotency handlers.
//!
//! Decides, per inbound request, whether the route handler may run.

mod guard_request;

pub use guard_request::IdempotencyGuard;
