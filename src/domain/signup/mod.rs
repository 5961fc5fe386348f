//! Subscription signup domain.
//!
//! Owns the fee validation rules, the payment-intent status state machine,
//! and the signup value types. Everything here is pure; talking to the
//! payment provider is the adapters' job.

mod errors;
mod fee;
mod intent;

pub use errors::SignupError;
pub use fee::{Currency, FeeError, SubscriptionFee};
pub use intent::{IntentStatus, SubscriptionOutcome};
