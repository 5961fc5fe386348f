//! HTTP DTOs for the signup payment endpoints.
//!
//! These types define the JSON wire format. Field names are camelCase to
//! match the client contract (`subscriptionFee` in, `clientSecret` out).

use serde::{Deserialize, Serialize};

/// Request to create a payment intent.
///
/// The fee is optional at the decode layer: field presence is part of
/// validation, not deserialization, so a missing field produces a 400 with
/// the contractual error body instead of a serde rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Requested fee as a decimal string, e.g. `"0.5"`.
    #[serde(default)]
    pub subscription_fee: Option<String>,
}

/// Successful intent creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Opaque secret for the provider's client-side confirmation widget.
    pub client_secret: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_camel_case() {
        let request: CreatePaymentIntentRequest =
            serde_json::from_str(r#"{"subscriptionFee": "0.5"}"#).unwrap();
        assert_eq!(request.subscription_fee.as_deref(), Some("0.5"));
    }

    #[test]
    fn missing_fee_deserializes_to_none() {
        let request: CreatePaymentIntentRequest = serde_json::from_str("{}").unwrap();
        assert!(request.subscription_fee.is_none());
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = CreatePaymentIntentResponse {
            client_secret: "pi_1_secret_2".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"clientSecret":"pi_1_secret_2"}"#);
    }

    #[test]
    fn error_body_shape() {
        let json = serde_json::to_string(&ErrorResponse::new("Invalid subscription fee")).unwrap();
        assert_eq!(json, r#"{"error":"Invalid subscription fee"}"#);
    }
}
