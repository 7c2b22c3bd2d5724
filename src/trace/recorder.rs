//! Event creation and finalization.

use chrono::Utc;
use std::time::Instant;

use super::event::{OperationKind, PendingEvent, RequestMetadata, TraceEvent};
use super::id::EventId;
use crate::client::ClientError;

/// Helper for the START -> FINALIZED lifecycle of trace events.
pub struct EventRecorder;

impl EventRecorder {
    /// Create a new event in START state, stamped with the current time.
    pub fn initialize(
        kind: OperationKind,
        resource_name: &str,
        operation: &str,
        vendor: &str,
    ) -> PendingEvent {
        let event = PendingEvent {
            id: EventId::new(),
            kind,
            operation: operation.to_string(),
            vendor: vendor.to_string(),
            resource_name: resource_name.to_string(),
            start_time: Utc::now(),
            started: Instant::now(),
        };
        tracing::trace!(
            event_id = %event.id,
            operation = %event.operation,
            topic = %event.resource_name,
            "trace event started"
        );
        event
    }

    /// Finalize a pending event.
    ///
    /// Consumes the pending event, so finalizing the same call twice does
    /// not type-check.
    pub fn finalize(
        event: PendingEvent,
        error: Option<ClientError>,
        request_metadata: RequestMetadata,
        response_payload: serde_json::Value,
    ) -> TraceEvent {
        let duration = event.started.elapsed();
        let finished = TraceEvent {
            id: event.id,
            kind: event.kind,
            operation: event.operation,
            vendor: event.vendor,
            resource_name: event.resource_name,
            start_time: event.start_time,
            end_time: Utc::now(),
            duration,
            error,
            request_metadata,
            response_payload,
        };
        tracing::trace!(
            event_id = %finished.id,
            success = !finished.is_error(),
            duration_ms = duration.as_secs_f64() * 1000.0,
            "trace event finalized"
        );
        finished
    }
}
