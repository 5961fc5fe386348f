//! Mock payment provider for testing.
//!
//! Configurable implementation of `PaymentProvider` for unit and integration
//! tests. Supports pre-configured responses, error injection, call tracking,
//! and webhook event simulation. Cloning shares the underlying state, so a
//! test can keep a handle for assertions after moving a clone into the
//! system under test.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::signup::IntentStatus;
use crate::ports::{
    CreateIntentRequest, IntentEvent, PaymentError, PaymentIntentHandle, PaymentProvider,
};

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_error(PaymentError::unavailable("test outage"));
///
/// let result = mock.create_intent(request).await;
/// assert!(result.is_err());
/// assert_eq!(mock.calls().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Statuses by intent id; created intents start as RequiresPaymentMethod.
    statuses: HashMap<String, IntentStatus>,

    /// Handle to return on the next `create_intent` call.
    next_handle: Option<PaymentIntentHandle>,

    /// Event to return from `verify_webhook`.
    next_event: Option<IntentEvent>,

    /// Error to return on every call until cleared.
    error: Option<PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the handle to return on the next `create_intent` call.
    pub fn set_handle(&self, handle: PaymentIntentHandle) {
        self.inner.lock().unwrap().next_handle = Some(handle);
    }

    /// Set the status reported for an intent id.
    pub fn set_status(&self, intent_id: &str, status: IntentStatus) {
        self.inner
            .lock()
            .unwrap()
            .statuses
            .insert(intent_id.to_string(), status);
    }

    /// Set the event returned by `verify_webhook`.
    pub fn set_event(&self, event: IntentEvent) {
        self.inner.lock().unwrap().next_event = Some(event);
    }

    /// Fail every call with this error until cleared.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().error = Some(error);
    }

    /// Clear a previously injected error.
    pub fn clear_error(&self) {
        self.inner.lock().unwrap().error = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertion Helpers
    // ════════════════════════════════════════════════════════════════════════════

    /// All recorded method calls, in order.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Ids of every intent created through this mock.
    pub fn created_intents(&self) -> Vec<String> {
        self.inner.lock().unwrap().statuses.keys().cloned().collect()
    }

    fn log(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn injected_error(&self) -> Option<PaymentError> {
        self.inner.lock().unwrap().error.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntentHandle, PaymentError> {
        self.log(
            "create_intent",
            vec![
                request.amount_minor_units.to_string(),
                request.currency.code().to_string(),
                request.automatic_payment_methods.to_string(),
            ],
        );

        if let Some(error) = self.injected_error() {
            return Err(error);
        }

        let mut state = self.inner.lock().unwrap();
        let handle = state.next_handle.take().unwrap_or_else(|| {
            let suffix = Uuid::new_v4().simple().to_string();
            let id = format!("pi_{}", &suffix[..16]);
            PaymentIntentHandle {
                client_secret: format!("{}_secret_{}", id, &suffix[16..]),
                id,
                status: IntentStatus::RequiresPaymentMethod,
            }
        });
        state.statuses.insert(handle.id.clone(), handle.status);

        Ok(handle)
    }

    async fn get_intent_status(&self, intent_id: &str) -> Result<IntentStatus, PaymentError> {
        self.log("get_intent_status", vec![intent_id.to_string()]);

        if let Some(error) = self.injected_error() {
            return Err(error);
        }

        self.inner
            .lock()
            .unwrap()
            .statuses
            .get(intent_id)
            .copied()
            .ok_or_else(|| {
                PaymentError::rejected(format!("No such payment_intent: {}", intent_id))
            })
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        signature: &str,
    ) -> Result<IntentEvent, PaymentError> {
        self.log("verify_webhook", vec![signature.to_string()]);

        if let Some(error) = self.injected_error() {
            return Err(error);
        }

        self.inner
            .lock()
            .unwrap()
            .next_event
            .clone()
            .ok_or_else(|| PaymentError::invalid_webhook("No event configured"))
    }
}
