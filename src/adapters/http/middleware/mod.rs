//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `idempotency` - Duplicate suppression for keyed mutating requests
//! - `request_id` - Request id generation

pub mod idempotency;
pub mod request_id;

pub use idempotency::{idempotency_middleware, IdempotencyState};
pub use request_id::MakeRequestUuid;
