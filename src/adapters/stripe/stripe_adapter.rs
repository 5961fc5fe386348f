//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe payment-intents
//! API. Intent creation and status reads go over form-encoded HTTPS with the
//! secret key as basic auth; webhook pushes are authenticated with
//! HMAC-SHA256 over the `Stripe-Signature` header.
//!
//! # Security
//!
//! - Constant-time signature comparison
//! - Timestamp validation (5-minute window) for replay protection
//! - Secrets handled via `secrecy::SecretString`

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::domain::signup::IntentStatus;
use crate::ports::{
    CreateIntentRequest, IntentEvent, IntentEventKind, PaymentError, PaymentIntentHandle,
    PaymentProvider,
};

use super::types::{
    hex_encode, SignatureHeader, StripeErrorEnvelope, StripePaymentIntent, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Outbound call timeout. The provider call is the only suspension point in
/// a request, so it must be bounded.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl From<&PaymentConfig> for StripeConfig {
    fn from(config: &PaymentConfig) -> Self {
        Self::new(
            config.stripe_secret_key.clone(),
            config.stripe_webhook_secret.clone(),
        )
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("reqwest client construction cannot fail with these options");

        Self {
            config,
            http_client,
        }
    }

    /// Map a transport-level failure to a provider error.
    fn map_transport_error(e: reqwest::Error) -> PaymentError {
        PaymentError::unavailable(e.to_string())
    }

    /// Map a non-2xx Stripe response to a provider error.
    async fn map_api_error(response: reqwest::Response) -> PaymentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Auth and server-side failures mean the call could not be completed;
        // other 4xx mean Stripe understood and declined the request.
        let base = if status.is_server_error()
            || status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            PaymentError::unavailable(format!("Stripe API error ({}): {}", status, body))
        } else {
            PaymentError::rejected(format!("Stripe API error ({}): {}", status, body))
        };

        match serde_json::from_str::<StripeErrorEnvelope>(&body) {
            Ok(envelope) => match envelope.error.code {
                Some(code) => base.with_provider_code(code),
                None => base,
            },
            Err(_) => base,
        }
    }

    /// Map a Stripe wire status to the domain state machine.
    ///
    /// Stripe has no "failed" status: a failed confirmation re-enters
    /// `requires_payment_method` with `last_payment_error` set, which is the
    /// terminal failure from the signup flow's point of view.
    fn map_intent_status(intent: &StripePaymentIntent) -> IntentStatus {
        match intent.status.as_str() {
            "requires_payment_method" if intent.last_payment_error.is_some() => {
                IntentStatus::Failed
            }
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            "requires_confirmation" | "requires_action" => IntentStatus::RequiresConfirmation,
            "processing" | "requires_capture" => IntentStatus::Processing,
            "succeeded" => IntentStatus::Succeeded,
            "canceled" => IntentStatus::Canceled,
            other => {
                tracing::warn!(status = other, intent_id = %intent.id, "Unknown intent status");
                IntentStatus::Failed
            }
        }
    }

    /// Verify a webhook signature using HMAC-SHA256.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), PaymentError> {
        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                "Webhook event from future - clock skew or manipulation"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature over "timestamp.payload"
        let signed_payload = format!("{}.{}", header.timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
                .expect("HMAC can take key of any size");

        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison
        let expected_bytes: &[u8] = expected.as_slice();
        let provided_bytes: &[u8] = &header.v1_signature;

        if expected_bytes.ct_eq(provided_bytes).unwrap_u8() != 1 {
            tracing::warn!(
                expected_signature = hex_encode(expected_bytes),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    /// Parse a verified webhook payload into a domain event.
    fn parse_event(&self, payload: &[u8]) -> Result<IntentEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        let kind = match stripe_event.event_type.as_str() {
            "payment_intent.succeeded" => IntentEventKind::Succeeded,
            "payment_intent.payment_failed" => IntentEventKind::PaymentFailed,
            "payment_intent.canceled" => IntentEventKind::Canceled,
            other => IntentEventKind::Unknown(other.to_string()),
        };

        let intent_id = stripe_event
            .data
            .object
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        if intent_id.is_empty() && !matches!(kind, IntentEventKind::Unknown(_)) {
            return Err(PaymentError::invalid_webhook(
                "Event payload missing intent id",
            ));
        }

        Ok(IntentEvent {
            id: stripe_event.id,
            intent_id,
            kind,
            created_at: stripe_event.created,
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntentHandle, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let amount = request.amount_minor_units.to_string();
        let mut params = vec![
            ("amount", amount.as_str()),
            ("currency", request.currency.code()),
        ];
        if request.automatic_payment_methods {
            params.push(("automatic_payment_methods[enabled]", "true"));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.secret_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let error = Self::map_api_error(response).await;
            tracing::error!(error = %error, "Stripe create_intent failed");
            return Err(error);
        }

        let intent: StripePaymentIntent = response
            .json()
            .await
            .map_err(|e| PaymentError::rejected(format!("Failed to parse Stripe response: {}", e)))?;

        let status = Self::map_intent_status(&intent);
        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::rejected("Stripe response missing client_secret")
        })?;

        Ok(PaymentIntentHandle {
            id: intent.id,
            client_secret,
            status,
        })
    }

    async fn get_intent_status(&self, intent_id: &str) -> Result<IntentStatus, PaymentError> {
        let url = format!(
            "{}/v1/payment_intents/{}",
            self.config.api_base_url, intent_id
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.secret_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let error = Self::map_api_error(response).await;
            tracing::error!(intent_id, error = %error, "Stripe get_intent_status failed");
            return Err(error);
        }

        let intent: StripePaymentIntent = response
            .json()
            .await
            .map_err(|e| PaymentError::rejected(format!("Failed to parse Stripe response: {}", e)))?;

        Ok(Self::map_intent_status(&intent))
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<IntentEvent, PaymentError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        // 2. Verify signature (includes timestamp validation)
        self.verify_signature(payload, &header)?;

        // 3. Parse and convert event
        let event = self.parse_event(payload)?;

        tracing::info!(
            event_id = %event.id,
            intent_id = %event.intent_id,
            kind = ?event.kind,
            "Webhook signature verified"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signup::Currency;

    fn test_config() -> StripeConfig {
        StripeConfig::new("sk_test_key", "whsec_test_secret")
    }

    fn intent_with_status(status: &str, last_error: bool) -> StripePaymentIntent {
        StripePaymentIntent {
            id: "pi_test".to_string(),
            client_secret: Some("pi_test_secret".to_string()),
            status: status.to_string(),
            amount: 50,
            currency: "eur".to_string(),
            last_payment_error: last_error.then(|| serde_json::json!({"code": "card_declined"})),
        }
    }

    fn create_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let result = mac.finalize().into_bytes();

        format!("t={},v1={}", timestamp, hex_encode(&result))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_default_base_url() {
        let config = test_config();
        assert_eq!(config.api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn config_with_base_url() {
        let config = test_config().with_base_url("http://localhost:8080");
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn config_from_payment_config() {
        let payment = PaymentConfig {
            stripe_secret_key: "sk_test_abc".to_string(),
            stripe_publishable_key: "pk_test_abc".to_string(),
            stripe_webhook_secret: "whsec_abc".to_string(),
        };
        let config = StripeConfig::from(&payment);
        assert_eq!(config.secret_key.expose_secret(), "sk_test_abc");
        assert_eq!(config.webhook_secret.expose_secret(), "whsec_abc");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Status Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn maps_plain_wire_statuses() {
        let cases = [
            ("requires_payment_method", IntentStatus::RequiresPaymentMethod),
            ("requires_confirmation", IntentStatus::RequiresConfirmation),
            ("requires_action", IntentStatus::RequiresConfirmation),
            ("processing", IntentStatus::Processing),
            ("requires_capture", IntentStatus::Processing),
            ("succeeded", IntentStatus::Succeeded),
            ("canceled", IntentStatus::Canceled),
        ];
        for (wire, expected) in cases {
            assert_eq!(
                StripePaymentAdapter::map_intent_status(&intent_with_status(wire, false)),
                expected,
                "wire status {wire}"
            );
        }
    }

    #[test]
    fn failed_attempt_maps_to_failed() {
        let intent = intent_with_status("requires_payment_method", true);
        assert_eq!(
            StripePaymentAdapter::map_intent_status(&intent),
            IntentStatus::Failed
        );
    }

    #[test]
    fn unknown_wire_status_maps_to_failed() {
        let intent = intent_with_status("some_future_status", false);
        assert_eq!(
            StripePaymentAdapter::map_intent_status(&intent),
            IntentStatus::Failed
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn verify_signature_valid() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature("whsec_test_secret", timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        assert!(adapter.verify_signature(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn verify_signature_wrong_secret() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature("wrong_secret", timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let result = adapter.verify_signature(payload.as_bytes(), &header);

        assert!(matches!(
            result.unwrap_err().code,
            crate::ports::PaymentErrorCode::InvalidWebhook
        ));
    }

    #[test]
    fn verify_signature_expired_timestamp() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let old_timestamp = chrono::Utc::now().timestamp() - 600;
        let signature = create_test_signature("whsec_test_secret", old_timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let err = adapter
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert!(err.message.contains("too old"));
    }

    #[test]
    fn verify_signature_future_timestamp() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let future_timestamp = chrono::Utc::now().timestamp() + 120;
        let signature = create_test_signature("whsec_test_secret", future_timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        let err = adapter
            .verify_signature(payload.as_bytes(), &header)
            .unwrap_err();
        assert!(err.message.contains("future"));
    }

    #[test]
    fn verify_signature_tolerates_small_skew() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp() + 30;
        let signature = create_test_signature("whsec_test_secret", timestamp, payload);

        let header = SignatureHeader::parse(&signature).unwrap();
        assert!(adapter.verify_signature(payload.as_bytes(), &header).is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event Parsing Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parse_payment_intent_succeeded() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {"object": {"id": "pi_123", "status": "succeeded"}},
            "livemode": false
        }"#;

        let event = adapter.parse_event(payload.as_bytes()).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(event.intent_id, "pi_123");
        assert_eq!(event.kind, IntentEventKind::Succeeded);
        assert_eq!(event.created_at, 1704067200);
    }

    #[test]
    fn parse_payment_failed_and_canceled() {
        let adapter = StripePaymentAdapter::new(test_config());
        for (wire, kind) in [
            ("payment_intent.payment_failed", IntentEventKind::PaymentFailed),
            ("payment_intent.canceled", IntentEventKind::Canceled),
        ] {
            let payload = format!(
                r#"{{"id":"evt_x","type":"{}","created":1,"data":{{"object":{{"id":"pi_x"}}}}}}"#,
                wire
            );
            let event = adapter.parse_event(payload.as_bytes()).unwrap();
            assert_eq!(event.kind, kind);
        }
    }

    #[test]
    fn parse_unknown_event_type() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{
            "id": "evt_2",
            "type": "charge.refunded",
            "created": 1,
            "data": {"object": {}}
        }"#;

        let event = adapter.parse_event(payload.as_bytes()).unwrap();
        assert!(matches!(
            event.kind,
            IntentEventKind::Unknown(ref s) if s == "charge.refunded"
        ));
    }

    #[test]
    fn parse_rejects_handled_event_without_intent_id() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{
            "id": "evt_3",
            "type": "payment_intent.succeeded",
            "created": 1,
            "data": {"object": {}}
        }"#;

        let err = adapter.parse_event(payload.as_bytes()).unwrap_err();
        assert!(err.message.contains("intent id"));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let adapter = StripePaymentAdapter::new(test_config());
        let err = adapter.parse_event(b"not json").unwrap_err();
        assert!(err.message.contains("Invalid JSON"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Integration Tests (verify_webhook full flow)
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_webhook_valid_signature_and_payload() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{
            "id": "evt_full",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {"object": {"id": "pi_full"}},
            "livemode": false
        }"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = create_test_signature("whsec_test_secret", timestamp, payload);

        let event = adapter
            .verify_webhook(payload.as_bytes(), &signature)
            .await
            .unwrap();
        assert_eq!(event.intent_id, "pi_full");
        assert_eq!(event.kind, IntentEventKind::Succeeded);
    }

    #[tokio::test]
    async fn verify_webhook_rejects_invalid_signature() {
        let adapter = StripePaymentAdapter::new(test_config());
        let payload = r#"{"id":"evt_test"}"#;
        let signature = format!("t={},v1=deadbeef", chrono::Utc::now().timestamp());

        assert!(adapter
            .verify_webhook(payload.as_bytes(), &signature)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn verify_webhook_rejects_malformed_header() {
        let adapter = StripePaymentAdapter::new(test_config());
        assert!(adapter
            .verify_webhook(br#"{"id":"evt_test"}"#, "malformed_header")
            .await
            .is_err());
    }

    #[test]
    fn create_intent_request_shape() {
        let request = CreateIntentRequest {
            amount_minor_units: 50,
            currency: Currency::Eur,
            automatic_payment_methods: true,
        };
        assert_eq!(request.currency.code(), "eur");
    }
}
