//! HTTP surface for the signup payment flow.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreatePaymentIntentRequest, CreatePaymentIntentResponse, ErrorResponse};
pub use handlers::{SignupApiError, SignupAppState};
pub use routes::{signup_router, signup_routes, webhook_routes};
