//! Payment-intent status state machine.
//!
//! The provider owns the intent; this module only classifies the statuses it
//! reports. Lifecycle:
//!
//! ```text
//! requires_payment_method -> requires_confirmation -> processing
//!                                                       |-> succeeded (terminal)
//!                                                       '-> failed    (terminal)
//! any state -> canceled (terminal, provider timeout/cancel)
//! ```
//!
//! Only `succeeded` activates a subscriber; every other terminal status
//! requires a fresh intent to retry.

use serde::{Deserialize, Serialize};

/// Status of a provider-side payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    /// Intent created, waiting for the client to attach a payment method.
    RequiresPaymentMethod,

    /// Payment method attached, waiting for the client to confirm.
    RequiresConfirmation,

    /// Provider is completing authorization.
    Processing,

    /// Payment collected. Terminal.
    Succeeded,

    /// Authorization failed. Terminal.
    Failed,

    /// Provider timed out or canceled the intent. Terminal.
    Canceled,
}

impl IntentStatus {
    /// Whether no further transition can occur from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IntentStatus::Succeeded | IntentStatus::Failed | IntentStatus::Canceled
        )
    }

    /// Whether this status activates the subscriber bound to the intent.
    pub fn activates_subscriber(&self) -> bool {
        matches!(self, IntentStatus::Succeeded)
    }
}

/// Outcome of reconciling an intent against the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionOutcome {
    /// Intent succeeded; the subscriber becomes active.
    Activated,

    /// Intent reached a non-success terminal status; the subscriber is
    /// discarded and may retry with a fresh intent.
    NotActivated,

    /// Intent has not reached a terminal status yet.
    Pending,
}

impl SubscriptionOutcome {
    /// Classify a reported intent status.
    pub fn from_status(status: IntentStatus) -> Self {
        if status.activates_subscriber() {
            SubscriptionOutcome::Activated
        } else if status.is_terminal() {
            SubscriptionOutcome::NotActivated
        } else {
            SubscriptionOutcome::Pending
        }
    }

    /// Whether this outcome is settled (no further reconciliation needed).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubscriptionOutcome::Pending)
    }
}
