//! Span helpers for intercepted MQTT operations.

#[cfg(feature = "telemetry")]
use tracing::Span;

/// Span type carried by a traced call
#[cfg(feature = "telemetry")]
pub type CallSpanHandle = Span;

#[cfg(not(feature = "telemetry"))]
pub type CallSpanHandle = NoOpSpan;

/// Helper for MQTT operation spans.
pub struct CallSpan;

impl CallSpan {
    /// Create a span for an intercepted publish/subscribe call.
    #[cfg(feature = "telemetry")]
    pub fn new(operation: &str, topic: &str, event_id: &str) -> Span {
        tracing::info_span!(
            "mqtt_operation",
            operation = %operation,
            topic = %topic,
            event_id = %event_id,
            success = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        )
    }

    #[cfg(not(feature = "telemetry"))]
    pub fn new(_operation: &str, _topic: &str, _event_id: &str) -> NoOpSpan {
        NoOpSpan
    }
}

/// No-op span when telemetry is disabled.
#[derive(Clone)]
#[allow(dead_code)]
pub struct NoOpSpan;

#[allow(dead_code)]
impl NoOpSpan {
    /// No-op record.
    pub fn record<T>(&self, _field: &str, _value: T) {}

    /// Run `f` directly.
    pub fn in_scope<F: FnOnce() -> T, T>(&self, f: F) -> T {
        f()
    }
}

/// Extension trait for spans.
pub trait SpanExt {
    /// Record success status on the span.
    fn record_success(&self, success: bool);

    /// Record duration in milliseconds on the span.
    fn record_duration_ms(&self, duration_ms: f64);
}

#[cfg(feature = "telemetry")]
impl SpanExt for Span {
    fn record_success(&self, success: bool) {
        self.record("success", success);
    }

    fn record_duration_ms(&self, duration_ms: f64) {
        self.record("duration_ms", duration_ms);
    }
}

#[cfg(not(feature = "telemetry"))]
impl SpanExt for NoOpSpan {
    fn record_success(&self, _success: bool) {}
    fn record_duration_ms(&self, _duration_ms: f64) {}
}
