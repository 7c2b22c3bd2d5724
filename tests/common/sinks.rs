//! Trace sinks with injectable behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use mqtt_tracer::instrument::{CompletionSignal, InstrumentationError};
use mqtt_tracer::trace::PendingEvent;
use mqtt_tracer::tracer::{TraceSink, TracerError};

/// How `FailingSink::add_event` misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum FailureMode {
    /// Return an error
    Reject,
    /// Panic inside the registry
    Panic,
}

/// A registry that never accepts events.
pub struct FailingSink {
    mode: FailureMode,
    attempts: AtomicUsize,
    exceptions: Mutex<Vec<String>>,
}

impl FailingSink {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            mode,
            attempts: AtomicUsize::new(0),
            exceptions: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn exceptions(&self) -> Vec<String> {
        self.exceptions.lock().unwrap().clone()
    }
}

impl TraceSink for FailingSink {
    fn add_event(&self, _: &PendingEvent, _: CompletionSignal) -> Result<(), TracerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            FailureMode::Reject => Err(TracerError::Full { limit: 0 }),
            FailureMode::Panic => panic!("registry exploded"),
        }
    }

    fn add_exception(&self, error: InstrumentationError) {
        self.exceptions.lock().unwrap().push(error.to_string());
    }
}

/// A registry that keeps the raw signals so tests can poll them by hand.
#[derive(Default)]
pub struct CapturingSink {
    pub signals: Mutex<Vec<CompletionSignal>>,
    pub events: Mutex<Vec<PendingEvent>>,
}

impl TraceSink for CapturingSink {
    fn add_event(&self, event: &PendingEvent, signal: CompletionSignal) -> Result<(), TracerError> {
        self.events.lock().unwrap().push(event.clone());
        self.signals.lock().unwrap().push(signal);
        Ok(())
    }

    fn add_exception(&self, error: InstrumentationError) {
        panic!("unexpected instrumentation failure: {error}");
    }
}
