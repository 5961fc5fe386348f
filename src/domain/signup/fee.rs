//! Subscription fee value object.
//!
//! Parses an untrusted decimal string (e.g. `"0.5"`) into an exact count of
//! minor currency units. Monetary amounts are always handled in minor units
//! to keep floating-point error out of provider calls.
//!
//! # Validation Rules
//!
//! - Input must parse as a finite decimal number
//! - Parsed value must be strictly positive
//! - Parsed value must not exceed the provider's eight-digit minor-unit cap
//! - Minor units are derived by rounding half away from zero, so `"0.5"`
//!   becomes 50 cents, never 49

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies supported for subscription fees.
///
/// The signup flow charges a single EUR fee; the enum exists so amounts are
/// never paired with a bare string at the provider boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Eur,
}

impl Currency {
    /// ISO 4217 lowercase code as the provider API expects it.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "eur",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors produced by fee validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeeError {
    /// Input did not parse as a finite decimal number.
    #[error("subscription fee is not a number")]
    NotANumber,

    /// Parsed value was zero, negative, or rounded to zero minor units.
    #[error("subscription fee must be positive")]
    NonPositive,

    /// Parsed value exceeds the maximum chargeable amount.
    #[error("subscription fee exceeds the maximum amount")]
    TooLarge,
}

/// Largest chargeable fee in major units. Stripe caps amounts at eight
/// digits in minor units; bounding here keeps the f64-to-i64 cast below
/// from ever saturating.
const MAX_FEE_MAJOR_UNITS: f64 = 999_999.99;

/// A validated subscription fee in minor currency units.
///
/// Construction via [`SubscriptionFee::parse`] is the only way to obtain a
/// value, so holding one guarantees `amount_minor_units > 0`.
///
/// # Example
///
/// ```
/// use subpay::domain::signup::SubscriptionFee;
///
/// let fee = SubscriptionFee::parse("0.5").unwrap();
/// assert_eq!(fee.amount_minor_units(), 50);
/// assert_eq!(fee.currency().code(), "eur");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionFee {
    amount_minor_units: i64,
    currency: Currency,
}

impl SubscriptionFee {
    /// Parse and validate a raw fee string.
    ///
    /// The conversion rounds half away from zero (`f64::round` semantics)
    /// to avoid truncation producing an off-by-one-cent amount.
    ///
    /// # Errors
    ///
    /// - [`FeeError::NotANumber`] if the input is empty, non-numeric, or
    ///   parses to NaN/infinity
    /// - [`FeeError::NonPositive`] if the value is <= 0, or so small that it
    ///   rounds to zero minor units
    /// - [`FeeError::TooLarge`] if the value exceeds the maximum chargeable
    ///   amount
    pub fn parse(raw: &str) -> Result<Self, FeeError> {
        let value: f64 = raw.trim().parse().map_err(|_| FeeError::NotANumber)?;

        if !value.is_finite() {
            return Err(FeeError::NotANumber);
        }
        if value <= 0.0 {
            return Err(FeeError::NonPositive);
        }
        if value > MAX_FEE_MAJOR_UNITS {
            return Err(FeeError::TooLarge);
        }

        let amount_minor_units = (value * 100.0).round() as i64;
        if amount_minor_units <= 0 {
            // Positive but below half a cent; the amount > 0 invariant wins.
            return Err(FeeError::NonPositive);
        }

        Ok(Self {
            amount_minor_units,
            currency: Currency::Eur,
        })
    }

    /// Amount in minor currency units (cents). Always positive.
    pub fn amount_minor_units(&self) -> i64 {
        self.amount_minor_units
    }

    /// Currency of the fee.
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl std::fmt::Display for SubscriptionFee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor_units / 100,
            self.amount_minor_units % 100,
            self.currency
        )
    }
}
