//! Trace event model.
//!
//! - [`EventRecorder`] creates events at call start and finalizes them on
//!   completion
//! - [`EventId`] correlates the two halves of a call in logs

pub mod event;
mod id;
mod recorder;

pub use event::{
    build_payload, OperationKind, PendingEvent, RequestMetadata, TraceEvent, VENDOR,
};
pub use id::EventId;
pub use recorder::EventRecorder;
