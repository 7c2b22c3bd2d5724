//! Telemetry for the tracer itself.
//!
//! - Structured logging with spans via the `tracing` crate
//! - Call metrics (latency, success rate, abandoned and timed-out calls)
//!
//! # Feature Flags
//!
//! - `telemetry` (default): per-call `mqtt_operation` spans
//! - `release-logs`: Strip debug/trace at compile time
//! - `max-perf`: Disable all tracing for maximum performance

mod init;
pub mod metrics;
mod spans;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
pub use metrics::{CallMetrics, Histogram, Metrics, MetricsSnapshot};
pub use spans::{CallSpan, CallSpanHandle, NoOpSpan, SpanExt};
