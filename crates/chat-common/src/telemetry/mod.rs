//! Telemetry and tracing setup

mod subscriber;

pub use subscriber::{try_init_tracing, TracingConfig, TracingError};
