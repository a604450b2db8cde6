//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `idempotency` - Lease keys, guard policy and guard outcomes
//! - `webhooks` - Provider signature schemes and verified payloads

pub mod idempotency;
pub mod webhooks;
