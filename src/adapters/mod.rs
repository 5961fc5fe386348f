//! Adapters - concrete implementations of the ports plus the HTTP surface.

pub mod activation;
pub mod http;
pub mod stripe;
