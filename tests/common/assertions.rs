//! Assertion helpers for finalized trace events.

use mqtt_tracer::client::ClientError;
use mqtt_tracer::trace::{OperationKind, TraceEvent};

/// Assert the identity fields of a finalized event.
pub fn assert_event(event: &TraceEvent, kind: OperationKind, topic: &str) {
    assert_eq!(event.kind, kind, "unexpected kind for {}", event.id);
    assert_eq!(
        event.resource_name, topic,
        "unexpected resource name for {}",
        event.id
    );
    assert_eq!(event.vendor, "mqtt");
    assert_eq!(event.operation, kind.as_str());
    assert!(
        event.end_time >= event.start_time,
        "event {} ended before it started",
        event.id
    );
}

/// Assert the recorded outcome of a finalized event.
pub fn assert_outcome(event: &TraceEvent, expected: Option<&ClientError>) {
    assert_eq!(
        event.error.as_ref(),
        expected,
        "unexpected error recorded on {}",
        event.id
    );
}
