//! Idempotency domain module.
//!
//! Duplicate suppression for mutating requests that carry a client-supplied
//! key. Only the fact that a key was used is recorded; responses are never
//! stored or replayed.
//!
//! # Module Structure
//!
//! - `lease_key` - Namespaced key written to the lease store
//! - `outcome` - Guard decisions and rejection reasons
//! - `policy` - Which requests are guarded and for how long

mod lease_key;
mod outcome;
mod policy;

pub use lease_key::LeaseKey;
pub use outcome::{GuardOutcome, IdempotencyRejection, ProceedReason};
pub use policy::IdempotencyPolicy;
