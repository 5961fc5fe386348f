//! Subpay - Subscription signup payment backend
//!
//! This crate implements the payment-intent lifecycle for a card-present
//! subscription signup flow: validating a requested fee, creating a
//! provider-side payment intent, handing its confirmation secret to the
//! client, and reconciling the asynchronous confirmation result into a
//! subscription outcome.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
