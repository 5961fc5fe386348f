//! Activation recorder port.
//!
//! Where a terminal [`SubscriptionOutcome`] gets durably recorded is the
//! integrator's decision; the core only defines the collaborator interface.
//! The shipped default (`adapters::activation::LogActivationRecorder`) logs
//! the outcome, matching the original system's behavior.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::signup::SubscriptionOutcome;

/// Errors from recording an activation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// The backing sink (database, queue, ...) could not be reached.
    #[error("activation sink unavailable: {0}")]
    Unavailable(String),
}

/// Port for recording terminal subscription outcomes.
#[async_trait]
pub trait ActivationRecorder: Send + Sync {
    /// Record a terminal outcome for the given intent.
    ///
    /// Called once per terminal reconciliation; implementations that persist
    /// should key on the intent id, which is unique per signup attempt.
    async fn record(
        &self,
        intent_id: &str,
        outcome: SubscriptionOutcome,
    ) -> Result<(), ActivationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_recorder_is_object_safe() {
        fn _accepts_dyn(_recorder: &dyn ActivationRecorder) {}
    }

    #[test]
    fn error_display() {
        let err = ActivationError::Unavailable("db down".into());
        assert!(err.to_string().contains("db down"));
    }
}
