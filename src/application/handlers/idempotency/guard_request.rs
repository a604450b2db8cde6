//! IdempotencyGuard - at-most-once admission for keyed mutating requests.

use axum::http::Method;
use std::sync::Arc;

use crate::domain::idempotency::{GuardOutcome, IdempotencyPolicy, IdempotencyRejection, ProceedReason};
use crate::ports::{LeaseAcquisition, LeaseStore};

/// Guard that admits each idempotency key at most once per TTL window.
///
/// Decision order:
/// 1. Method outside the guarded set → proceed
/// 2. No key (absent or blank) → proceed; idempotency is opt-in per request
/// 3. Key too long → reject (400)
/// 4. No store configured → proceed
/// 5. Atomic create-if-absent → proceed if created, reject (409) if held
/// 6. Store error or timeout → proceed (fail-open)
///
/// At most one lease write happens per request and none for requests that
/// are let through without a key. Leases are never renewed or deleted here.
pub struct IdempotencyGuard {
    store: Option<Arc<dyn LeaseStore>>,
    policy: IdempotencyPolicy,
}

impl IdempotencyGuard {
    pub fn new(store: Option<Arc<dyn LeaseStore>>, policy: IdempotencyPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &IdempotencyPolicy {
        &self.policy
    }

    /// Decides whether a request may proceed.
    ///
    /// `key` is the raw header value; `path` is only used when the policy
    /// scopes keys by route.
    pub async fn check(&self, method: &Method, key: Option<&str>, path: &str) -> GuardOutcome {
        if !self.policy.applies_to(method) {
            return GuardOutcome::Proceed(ProceedReason::SafeMethod);
        }

        let key = match key {
            Some(k) if !k.trim().is_empty() => k,
            _ => return GuardOutcome::Proceed(ProceedReason::NoKey),
        };

        if key.len() > self.policy.max_key_length() {
            tracing::info!(
                method = %method,
                key_len = key.len(),
                outcome = "key_too_long",
                "Idempotency key rejected"
            );
            return GuardOutcome::Reject(IdempotencyRejection::KeyTooLong {
                max: self.policy.max_key_length(),
            });
        }

        let Some(store) = &self.store else {
            return GuardOutcome::Proceed(ProceedReason::StoreUnconfigured);
        };

        let lease_key = self.policy.lease_key(method, path, key);
        match store.try_acquire(lease_key.as_str(), self.policy.ttl()).await {
            Ok(LeaseAcquisition::Acquired) => GuardOutcome::Proceed(ProceedReason::LeaseAcquired),
            Ok(LeaseAcquisition::AlreadyHeld) => {
                tracing::info!(
                    method = %method,
                    path = %path,
                    outcome = "duplicate",
                    "Duplicate idempotency key rejected"
                );
                GuardOutcome::Reject(IdempotencyRejection::Duplicate)
            }
            Err(e) => {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    outcome = "fail_open",
                    error = %e,
                    "Lease store unavailable, allowing request"
                );
                GuardOutcome::Proceed(ProceedReason::StoreUnavailable)
            }
        }
    }
}

impl std::fmt::Debug for IdempotencyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdempotencyGuard")
            .field("store_configured", &self.store.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}
