//! Instrumentation-internal errors

use thiserror::Error;

use crate::client::MissingMethod;
use crate::tracer::TracerError;

/// Failures raised by instrumentation code itself
///
/// These never reach the application. They are caught by
/// [`isolate`](crate::instrument::isolate) and handed to the tracer's exception sink.
#[derive(Error, Debug)]
pub enum InstrumentationError {
    #[error(transparent)]
    MissingMethod(#[from] MissingMethod),

    #[error("Failed to build event payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Tracer rejected event: {0}")]
    Registry(#[from] TracerError),

    #[error("Instrumentation panicked: {0}")]
    Panicked(String),
}
