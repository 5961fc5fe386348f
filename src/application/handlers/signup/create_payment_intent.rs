//! CreatePaymentIntentHandler - Command handler for opening a payment intent.

use std::sync::Arc;

use crate::domain::signup::{FeeError, SignupError, SubscriptionFee};
use crate::ports::{CreateIntentRequest, PaymentProvider};

/// Command to create a payment intent for a requested fee.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    /// Raw fee string from the untrusted request body, e.g. `"0.5"`.
    pub subscription_fee: String,
}

/// Result of a successful intent creation.
///
/// Carries only what the caller needs to proceed: the client secret for the
/// confirmation widget and the intent id for diagnostics/reconciliation.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentResult {
    pub intent_id: String,
    pub client_secret: String,
}

/// Handler for creating provider-side payment intents.
///
/// Each invocation opens a fresh intent: the amount on a provider-side
/// intent is immutable once created, so a fee-tier change before
/// confirmation must create a new intent rather than mutate the old one.
/// Superseded intents are abandoned, not canceled.
pub struct CreatePaymentIntentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, SignupError> {
        // 1. Validate the requested fee
        let fee = SubscriptionFee::parse(&cmd.subscription_fee)?;

        // 2. Re-check positivity; never trust upstream callers
        if fee.amount_minor_units() <= 0 {
            return Err(SignupError::InvalidFee(FeeError::NonPositive));
        }

        // 3. One provider call per invocation
        let handle = self
            .payment_provider
            .create_intent(CreateIntentRequest {
                amount_minor_units: fee.amount_minor_units(),
                currency: fee.currency(),
                automatic_payment_methods: true,
            })
            .await
            .map_err(|e| {
                tracing::error!(
                    code = %e.code,
                    provider_code = ?e.provider_code,
                    error = %e.message,
                    "Payment intent creation failed"
                );
                SignupError::from(e)
            })?;

        // A handle without a secret cannot drive confirmation
        if handle.client_secret.is_empty() {
            tracing::error!(intent_id = %handle.id, "Provider returned no client secret");
            return Err(SignupError::payment_failed(true));
        }

        tracing::info!(
            intent_id = %handle.id,
            amount_minor_units = fee.amount_minor_units(),
            currency = %fee.currency(),
            "Payment intent created"
        );

        Ok(CreatePaymentIntentResult {
            intent_id: handle.id,
            client_secret: handle.client_secret,
        })
    }
}
