//! Exporters that ship finalized events out of the process.

use async_trait::async_trait;
use thiserror::Error;

use crate::trace::TraceEvent;

/// Errors that can occur while exporting events
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Destination for finalized trace events
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Ship a batch of events.
    async fn export(&self, events: &[TraceEvent]) -> Result<(), ExportError>;
}

/// Writes each event as a JSON line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogExporter;

#[async_trait]
impl Exporter for LogExporter {
    async fn export(&self, events: &[TraceEvent]) -> Result<(), ExportError> {
        for event in events {
            let line = serde_json::to_string(event)?;
            tracing::info!(target: "mqtt_tracer::export", event = %line, "trace event");
        }
        Ok(())
    }
}
