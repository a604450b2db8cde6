//! Guard decisions.

use axum::http::StatusCode;
use thiserror::Error;

/// Decision for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Hand the request to the route handler.
    Proceed(ProceedReason),
    /// Answer immediately without running the handler.
    Reject(IdempotencyRejection),
}

impl GuardOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardOutcome::Proceed(_))
    }
}

/// Why a request was allowed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProceedReason {
    /// Method is not in the guarded set.
    SafeMethod,
    /// Request carried no idempotency key.
    NoKey,
    /// This request created the lease.
    LeaseAcquired,
    /// No lease store is configured.
    StoreUnconfigured,
    /// Lease store failed or timed out; the guard fails open.
    StoreUnavailable,
}

impl ProceedReason {
    /// Stable label for structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProceedReason::SafeMethod => "safe_method",
            ProceedReason::NoKey => "no_key",
            ProceedReason::LeaseAcquired => "lease_acquired",
            ProceedReason::StoreUnconfigured => "store_unconfigured",
            ProceedReason::StoreUnavailable => "fail_open",
        }
    }
}

/// Reasons a guarded request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdempotencyRejection {
    /// A live lease already exists for this key.
    #[error("Duplicate request for idempotency key")]
    Duplicate,

    /// Key exceeds the accepted length.
    #[error("Idempotency key longer than {max} bytes")]
    KeyTooLong { max: usize },
}

impl IdempotencyRejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IdempotencyRejection::Duplicate => StatusCode::CONFLICT,
            IdempotencyRejection::KeyTooLong { .. } => StatusCode::BAD_REQUEST,
        }
    }
}
