//! Payment provider port.
//!
//! Defines the contract for the external payment provider (e.g. Stripe) as a
//! capability interface with three operations: create an intent for a
//! validated amount, read the status of a previously created intent, and
//! authenticate a provider-pushed confirmation event.
//!
//! The provider is the sole source of truth for intent state; the core holds
//! only a read-through handle (id + client secret) and never mutates
//! provider state outside the creation call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::signup::{Currency, IntentStatus, SignupError};

/// Port for the payment provider integration.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent for a validated amount.
    ///
    /// One outbound call per invocation, no deduplication: every invocation
    /// yields a distinct intent, and superseded intents are simply
    /// abandoned. Returns only the handle the caller needs to proceed.
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntentHandle, PaymentError>;

    /// Read the current status of a previously created intent.
    async fn get_intent_status(&self, intent_id: &str) -> Result<IntentStatus, PaymentError>;

    /// Verify a webhook signature and parse the pushed confirmation event.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<IntentEvent, PaymentError>;
}

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIntentRequest {
    /// Amount in minor currency units. Must be positive.
    pub amount_minor_units: i64,

    /// Currency of the amount.
    pub currency: Currency,

    /// Ask the provider to auto-select a compatible payment method type.
    pub automatic_payment_methods: bool,
}

/// Read-through reference to a provider-side payment intent.
///
/// Deliberately minimal: the id for later reconciliation, the opaque client
/// secret the client needs to complete confirmation, and the status for
/// diagnostics. The full provider object never crosses this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentHandle {
    /// Provider's intent id (`pi_...`).
    pub id: String,

    /// Opaque secret used by the client-side confirmation widget.
    pub client_secret: String,

    /// Status at creation time.
    pub status: IntentStatus,
}

/// Provider-pushed confirmation event, post signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentEvent {
    /// Provider's event id (`evt_...`), usable for idempotent handling.
    pub id: String,

    /// The payment intent the event refers to.
    pub intent_id: String,

    /// What the provider reported.
    pub kind: IntentEventKind,

    /// When the event occurred (Unix timestamp).
    pub created_at: i64,
}

/// Confirmation event types the core reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentEventKind {
    /// Payment collected.
    Succeeded,

    /// Authorization failed.
    PaymentFailed,

    /// Intent canceled or timed out.
    Canceled,

    /// Event type the core does not handle; acknowledged and ignored.
    Unknown(String),
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error category.
    pub code: PaymentErrorCode,

    /// Human-readable detail. Logged server-side, never sent to clients.
    pub message: String,

    /// Provider's own error code, when one was returned.
    pub provider_code: Option<String>,

    /// Whether the operation can be safely retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the provider's error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Network, timeout, or auth failure: the call never completed.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Unavailable, message)
    }

    /// The provider received and declined the request.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Rejected, message)
    }

    /// Webhook payload could not be authenticated.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for SignupError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::InvalidWebhook => SignupError::InvalidWebhookSignature,
            _ => SignupError::payment_failed(err.retryable),
        }
    }
}

/// Payment error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// The provider call could not be completed (network/auth/timeout).
    /// Safely retryable: intent creation has no destructive side effect on
    /// prior intents.
    Unavailable,

    /// The provider declined the request (e.g. invalid currency).
    Rejected,

    /// Webhook signature verification failed.
    InvalidWebhook,
}

impl PaymentErrorCode {
    /// Whether this error category is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::Unavailable)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::Unavailable => "unavailable",
            PaymentErrorCode::Rejected => "rejected",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn unavailable_is_retryable() {
        assert!(PaymentErrorCode::Unavailable.is_retryable());
        assert!(!PaymentErrorCode::Rejected.is_retryable());
        assert!(!PaymentErrorCode::InvalidWebhook.is_retryable());
    }

    #[test]
    fn error_display_includes_code_and_message() {
        let err = PaymentError::unavailable("connection refused");
        assert!(err.to_string().contains("unavailable"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn provider_detail_never_reaches_signup_error() {
        let err = PaymentError::rejected("amount_too_small: sk_live hint").into();
        match err {
            SignupError::PaymentFailed { retryable } => assert!(!retryable),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn invalid_webhook_maps_to_signature_error() {
        let err: SignupError = PaymentError::invalid_webhook("bad mac").into();
        assert_eq!(err, SignupError::InvalidWebhookSignature);
    }
}
