#![forbid(unsafe_code)]

//! Sample flows, one module per demonstrated mechanism.

pub mod counter;
pub mod lifecycle;
pub mod observable;
pub mod user;

/// Samples mix error types, so they all surface boxed.
pub type SampleResult = Result<(), Box<dyn std::error::Error>>;
