//! Signup-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidFee | 400 |
//! | InvalidWebhookSignature | 400 |
//! | PaymentFailed | 500 |
//!
//! `PaymentFailed` deliberately carries no provider detail: the underlying
//! cause is logged where the failure happens and callers only see a generic
//! "could not initiate payment" condition.

use thiserror::Error;

use super::fee::FeeError;

/// Errors surfaced by the signup operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    /// The requested fee failed validation. Caller-correctable.
    #[error("invalid subscription fee: {0}")]
    InvalidFee(#[from] FeeError),

    /// A provider webhook push could not be authenticated.
    #[error("invalid webhook signature")]
    InvalidWebhookSignature,

    /// The payment provider call could not be completed or was declined.
    #[error("could not initiate payment")]
    PaymentFailed {
        /// Whether retrying the same request may succeed.
        retryable: bool,
    },
}

impl SignupError {
    pub fn payment_failed(retryable: bool) -> Self {
        SignupError::PaymentFailed { retryable }
    }
}
