//! Errors returned by webhook intake.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::webhooks::WebhookError;
use crate::ports::DispatchError;

#[derive(Debug, Error)]
pub enum WebhookIntakeError {
    /// Delivery failed verification or parsing, or no secret is configured.
    #[error(transparent)]
    Rejected(#[from] WebhookError),

    /// Verified delivery could not be handed off.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl WebhookIntakeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookIntakeError::Rejected(e) => e.status_code(),
            WebhookIntakeError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
