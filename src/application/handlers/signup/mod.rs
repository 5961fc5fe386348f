//! Signup command handlers.
//!
//! Two operations make up the payment-intent orchestrator:
//! - [`CreatePaymentIntentHandler`] - validate a fee and open a fresh
//!   provider-side intent
//! - [`ReconcileIntentHandler`] - observe the confirmation result and settle
//!   the subscription outcome

mod create_payment_intent;
mod reconcile_intent;

pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentHandler, CreatePaymentIntentResult,
};
pub use reconcile_intent::{ReconcileIntentCommand, ReconcileIntentHandler};
