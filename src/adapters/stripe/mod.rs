//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe payment-intents
//! API, plus a configurable mock provider for tests.

mod mock_payment_provider;
mod stripe_adapter;
mod types;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use types::{hex_encode, SignatureHeader, SignatureParseError};
