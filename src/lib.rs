//! Tracing instrumentation for MQTT clients.
//!
//! Wraps a client's `publish` and `subscribe` operations so that every call
//! produces a trace event, finalized when the call's completion callback
//! fires. Instrumentation is purely observational: wrapped calls return the
//! same values and deliver the same callback arguments as unwrapped ones, and
//! failures inside instrumentation are reported to the tracer instead of the
//! application.
//!
//! - [`client`]: the client seam (a struct of replaceable operations)
//! - [`instrument`]: constructor and operation interceptors
//! - [`trace`]: trace event model
//! - [`tracer`]: the registry that awaits and stores finished events
//! - [`telemetry`]: logging, spans and metrics

pub mod client;
pub mod instrument;
pub mod telemetry;
pub mod trace;
pub mod tracer;

pub use client::{ClientError, ClientOptions, MqttClient};
pub use instrument::{init, wrap_constructor, Constructor};
pub use trace::{OperationKind, TraceEvent};
pub use tracer::{TraceSink, Tracer, TracerConfig, GLOBAL_TRACER};
