//! Telemetry and logging infrastructure
//!
//! Structured logging with tracing; console only.

pub mod logging;

pub use logging::{init_logging, LogConfig};
