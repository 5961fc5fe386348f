//! HTTP handlers for the signup payment endpoints.
//!
//! These handlers connect axum routes to the application layer command
//! handlers and own the mapping from `SignupError` to wire responses.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::signup::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, ReconcileIntentCommand,
    ReconcileIntentHandler,
};
use crate::domain::signup::{FeeError, SignupError};
use crate::ports::{ActivationRecorder, IntentEventKind, PaymentProvider};

use super::dto::{CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; dependencies are Arc-wrapped trait objects so tests
/// can substitute fakes.
#[derive(Clone)]
pub struct SignupAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub activation_recorder: Arc<dyn ActivationRecorder>,
}

impl SignupAppState {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        activation_recorder: Arc<dyn ActivationRecorder>,
    ) -> Self {
        Self {
            payment_provider,
            activation_recorder,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.payment_provider.clone())
    }

    pub fn reconcile_intent_handler(&self) -> ReconcileIntentHandler {
        ReconcileIntentHandler::new(
            self.payment_provider.clone(),
            self.activation_recorder.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-payment-intent - Create a payment intent for a fee tier.
///
/// The body is decoded as a tagged result: an undecodable body or a missing
/// `subscriptionFee` field is the same caller error as an unparseable fee,
/// never a serde-flavored rejection.
pub async fn create_payment_intent(
    State(state): State<SignupAppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SignupApiError> {
    let subscription_fee = match payload {
        Ok(Json(request)) => request.subscription_fee,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Undecodable create-payment-intent body");
            None
        }
    }
    .ok_or(SignupError::InvalidFee(FeeError::NotANumber))?;

    let handler = state.create_payment_intent_handler();
    let result = handler
        .handle(CreatePaymentIntentCommand { subscription_fee })
        .await?;

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: result.client_secret,
    }))
}

/// POST /api/webhooks/stripe - Handle provider confirmation pushes.
///
/// Signature verification happens before anything else; unhandled event
/// types are acknowledged so the provider stops retrying them.
pub async fn handle_stripe_webhook(
    State(state): State<SignupAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, SignupApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(SignupError::InvalidWebhookSignature)?;

    let event = state
        .payment_provider
        .verify_webhook(&body, signature)
        .await
        .map_err(SignupError::from)?;

    if let IntentEventKind::Unknown(event_type) = &event.kind {
        tracing::debug!(event_id = %event.id, event_type, "Ignoring unhandled webhook event");
        return Ok(StatusCode::OK);
    }

    let handler = state.reconcile_intent_handler();
    handler
        .handle(ReconcileIntentCommand {
            intent_id: event.intent_id,
        })
        .await?;

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts signup errors to HTTP responses.
///
/// Provider failures become a generic 500; the underlying cause is logged
/// where the failure happened, never sent over the wire.
pub struct SignupApiError(SignupError);

impl From<SignupError> for SignupApiError {
    fn from(err: SignupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SignupApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            SignupError::InvalidFee(_) => (StatusCode::BAD_REQUEST, "Invalid subscription fee"),
            SignupError::InvalidWebhookSignature => {
                (StatusCode::BAD_REQUEST, "Invalid webhook signature")
            }
            SignupError::PaymentFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing your request",
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
