//! Activation recorder adapters.

mod log_recorder;

pub use log_recorder::LogActivationRecorder;
