//! Axum router configuration for the signup payment endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_payment_intent, handle_stripe_webhook, SignupAppState};

/// Create the signup API router.
///
/// # Routes
/// - `POST /create-payment-intent` - Create a payment intent for a fee tier
pub fn signup_routes() -> Router<SignupAppState> {
    Router::new().route("/create-payment-intent", post(create_payment_intent))
}

/// Create the provider webhook router.
///
/// Separate from the signup routes because webhooks carry no user session;
/// they are authenticated by signature instead.
///
/// # Routes
/// - `POST /stripe` - Handle provider confirmation pushes
pub fn webhook_routes() -> Router<SignupAppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Create the complete signup module router, mounted under `/api`.
///
/// # Example
///
/// ```ignore
/// let state = SignupAppState::new(provider, recorder);
/// let app = signup_router().with_state(state);
/// ```
pub fn signup_router() -> Router<SignupAppState> {
    Router::new()
        .nest("/api", signup_routes())
        .nest("/api/webhooks", webhook_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::activation::LogActivationRecorder;
    use crate::adapters::stripe::MockPaymentProvider;

    fn app() -> Router {
        let state = SignupAppState::new(
            Arc::new(MockPaymentProvider::new()),
            Arc::new(LogActivationRecorder::new()),
        );
        signup_router().with_state(state)
    }

    #[tokio::test]
    async fn router_mounts_create_payment_intent() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/create-payment-intent")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"subscriptionFee":"0.5"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn router_mounts_stripe_webhook() {
        // No signature header: authenticated rejection, not a 404
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/webhooks/stripe")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
