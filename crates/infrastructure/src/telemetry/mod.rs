//! Tracing subscriber setup
//!
//! Installs a console subscriber filtered by `RUST_LOG` or the configured
//! filter, writing human-readable text or JSON lines.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
