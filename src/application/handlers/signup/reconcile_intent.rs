//! ReconcileIntentHandler - Command handler for settling confirmation results.

use std::sync::Arc;

use crate::domain::signup::{SignupError, SubscriptionOutcome};
use crate::ports::{ActivationRecorder, PaymentProvider};

/// Command to reconcile a payment intent against the provider.
#[derive(Debug, Clone)]
pub struct ReconcileIntentCommand {
    pub intent_id: String,
}

/// Handler for reconciling confirmation results into subscription outcomes.
///
/// The provider is the sole source of truth: the status is always re-read,
/// even when reconciliation was triggered by a webhook push that embedded
/// one. Only a terminal observation is recorded; `succeeded` is the single
/// status that activates a subscriber, and every other terminal status
/// requires a fresh intent to retry.
pub struct ReconcileIntentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    activation_recorder: Arc<dyn ActivationRecorder>,
}

impl ReconcileIntentHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        activation_recorder: Arc<dyn ActivationRecorder>,
    ) -> Self {
        Self {
            payment_provider,
            activation_recorder,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileIntentCommand,
    ) -> Result<SubscriptionOutcome, SignupError> {
        // 1. Read the authoritative status
        let status = self
            .payment_provider
            .get_intent_status(&cmd.intent_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    intent_id = %cmd.intent_id,
                    code = %e.code,
                    error = %e.message,
                    "Intent status lookup failed"
                );
                SignupError::from(e)
            })?;

        // 2. Classify
        let outcome = SubscriptionOutcome::from_status(status);

        // 3. Record terminal outcomes through the collaborator
        if outcome.is_terminal() {
            self.activation_recorder
                .record(&cmd.intent_id, outcome)
                .await
                .map_err(|e| {
                    tracing::error!(
                        intent_id = %cmd.intent_id,
                        error = %e,
                        "Failed to record subscription outcome"
                    );
                    SignupError::payment_failed(true)
                })?;
        }

        tracing::info!(
            intent_id = %cmd.intent_id,
            status = ?status,
            outcome = ?outcome,
            "Intent reconciled"
        );

        Ok(outcome)
    }
}
