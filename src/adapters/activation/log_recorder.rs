//! Logging activation recorder.
//!
//! Default `ActivationRecorder`: emits the outcome to the structured log.
//! Integrators replace this with a persistence-backed implementation.

use async_trait::async_trait;

use crate::domain::signup::SubscriptionOutcome;
use crate::ports::{ActivationError, ActivationRecorder};

/// Activation recorder that logs terminal outcomes via `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LogActivationRecorder;

impl LogActivationRecorder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActivationRecorder for LogActivationRecorder {
    async fn record(
        &self,
        intent_id: &str,
        outcome: SubscriptionOutcome,
    ) -> Result<(), ActivationError> {
        match outcome {
            SubscriptionOutcome::Activated => {
                tracing::info!(intent_id, "Subscriber activated");
            }
            SubscriptionOutcome::NotActivated => {
                tracing::warn!(intent_id, "Subscription payment did not complete");
            }
            SubscriptionOutcome::Pending => {
                // Callers only record terminal outcomes; log if one slips through
                tracing::debug!(intent_id, "Ignoring non-terminal outcome");
            }
        }
        Ok(())
    }
}
