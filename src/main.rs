//! Subpay server binary.
//!
//! Loads configuration, initializes tracing, wires the Stripe adapter into
//! the signup router, and serves.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use subpay::adapters::activation::LogActivationRecorder;
use subpay::adapters::http::signup::{signup_router, SignupAppState};
use subpay::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use subpay::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    if config.payment.is_live_mode() && !config.server.is_production() {
        tracing::warn!("Live Stripe key configured outside production");
    }

    let stripe_config = StripeConfig::from(&config.payment);
    let state = SignupAppState::new(
        Arc::new(StripePaymentAdapter::new(stripe_config)),
        Arc::new(LogActivationRecorder::new()),
    );

    let app = signup_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(
            CorsLayer::new()
                .allow_methods(Any)
                .allow_headers(Any)
                .allow_origin(Any),
        );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, test_mode = config.payment.is_test_mode(), "Starting subpay server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
