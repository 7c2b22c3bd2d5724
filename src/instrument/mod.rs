//! Publish/subscribe interception.
//!
//! - [`wrap_constructor`] / [`init`] instrument every client a constructor builds
//! - [`wrap_publish`] / [`wrap_subscribe`] trace individual operations
//! - [`isolate`] keeps instrumentation failures away from the application
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mqtt_tracer::instrument::{self, Constructor};
//!
//! let connect: Constructor<Transport> = Arc::new(build_client);
//! let connect = instrument::init(connect);
//!
//! let client = connect(transport, options);
//! client.publish("sensors/1", "21.5", Default::default(), None)?;
//! ```

mod completion;
mod error;
mod guard;
mod instance;
mod interceptor;

pub use completion::{CompletionSignal, CompletionTracker, Resolution};
pub use error::InstrumentationError;
pub use guard::isolate;
pub use instance::{init, instrument_client, wrap_constructor, Constructor};
pub use interceptor::{wrap_publish, wrap_subscribe};
