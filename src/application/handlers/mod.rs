//! Command handlers grouped by domain module.

pub mod signup;
