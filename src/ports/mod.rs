//! Ports - capability interfaces the application layer depends on.
//!
//! Adapters implement these traits; handlers only ever see the trait
//! objects, which keeps provider transport details out of the core and
//! makes every handler testable with a substitutable fake.

mod activation;
mod payment_provider;

pub use activation::{ActivationError, ActivationRecorder};
pub use payment_provider::{
    CreateIntentRequest, IntentEvent, IntentEventKind, PaymentError, PaymentErrorCode,
    PaymentIntentHandle, PaymentProvider,
};
