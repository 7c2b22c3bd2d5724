//! Fault isolation for instrumentation code.
//!
//! Every instrumentation step runs through [`isolate`]. Errors and panics are
//! logged, reported to the tracer, and turned into `None`, and the caller
//! carries on as if instrumentation were absent.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::error::InstrumentationError;
use crate::tracer::TraceSink;

/// Run an instrumentation step, containing any failure.
pub fn isolate<T, F>(sink: &dyn TraceSink, step: F) -> Option<T>
where
    F: FnOnce() -> Result<T, InstrumentationError>,
{
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            report(sink, err);
            None
        }
        Err(payload) => {
            report(sink, InstrumentationError::Panicked(panic_message(&payload)));
            None
        }
    }
}

/// Hand an error to the exception sink. A panicking sink is contained too.
fn report(sink: &dyn TraceSink, err: InstrumentationError) {
    tracing::warn!(error = %err, "instrumentation failed, continuing untraced");
    if panic::catch_unwind(AssertUnwindSafe(|| sink.add_exception(err))).is_err() {
        tracing::error!("exception sink panicked while reporting instrumentation failure");
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
