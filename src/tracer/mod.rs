//! Tracer registry.
//!
//! The interceptors talk to a [`TraceSink`]: they register each pending event
//! together with the [`CompletionSignal`] that will carry its finalized form,
//! and report their own failures as exceptions. [`Tracer`] is the in-memory
//! implementation used by the process-wide [`GLOBAL_TRACER`].

mod config;
pub mod export;

pub use config::{
    ConfigError, TracerConfig, ENV_MAX_EVENTS, ENV_MAX_PENDING, ENV_METADATA_ONLY,
    ENV_SETTLE_TIMEOUT_MS,
};
pub use export::{ExportError, Exporter, LogExporter};

use futures::future::join_all;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::instrument::{CompletionSignal, InstrumentationError, Resolution};
use crate::telemetry::metrics::{Metrics, MetricsSnapshot};
use crate::trace::{PendingEvent, TraceEvent};

/// Process-wide tracer, configured from the environment.
pub static GLOBAL_TRACER: Lazy<Arc<Tracer>> = Lazy::new(|| {
    let config = TracerConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "invalid tracer configuration, using defaults");
        TracerConfig::default()
    });
    Arc::new(Tracer::new(config))
});

/// Errors returned when registering an event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TracerError {
    #[error("Tracer is closed")]
    Closed,

    #[error("Too many pending events (limit {limit})")]
    Full { limit: usize },
}

/// Interface between the interceptors and whatever collects their events
pub trait TraceSink: Send + Sync {
    /// Register a started event and the signal that resolves when it finishes.
    fn add_event(&self, event: &PendingEvent, signal: CompletionSignal) -> Result<(), TracerError>;

    /// Record a failure raised by instrumentation code.
    fn add_exception(&self, error: InstrumentationError);

    /// Whether message content should be left out of payloads.
    fn metadata_only(&self) -> bool {
        false
    }
}

/// Outcome of awaiting the outstanding events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub finalized: usize,
    pub abandoned: usize,
    pub timed_out: usize,
}

struct Registration {
    event: PendingEvent,
    signal: CompletionSignal,
}

#[derive(Default)]
struct TracerState {
    closed: bool,
    pending: Vec<Registration>,
    finished: VecDeque<TraceEvent>,
    exceptions: VecDeque<InstrumentationError>,
}

/// In-memory tracer registry
pub struct Tracer {
    config: TracerConfig,
    state: Mutex<TracerState>,
    metrics: Metrics,
}

impl Tracer {
    pub fn new(config: TracerConfig) -> Self {
        Self {
            metrics: Metrics::with_sample_limit(config.max_events),
            state: Mutex::new(TracerState::default()),
            config,
        }
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    // A panic while holding the lock must not disable tracing for good.
    fn state(&self) -> MutexGuard<'_, TracerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stop accepting new events. Outstanding events can still be settled.
    pub fn close(&self) {
        self.state().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Number of registered events not yet settled.
    pub fn pending_count(&self) -> usize {
        self.state().pending.len()
    }

    /// Await every outstanding event, each bounded by `settle_timeout`.
    ///
    /// Finalized events move to the buffer. Abandoned and timed-out events
    /// are counted and forgotten.
    pub async fn settle(&self) -> SettleReport {
        let pending = std::mem::take(&mut self.state().pending);
        let wait = self.config.settle_timeout;

        let outcomes = join_all(pending.into_iter().map(|registration| async move {
            let outcome = tokio::time::timeout(wait, registration.signal).await;
            (registration.event, outcome)
        }))
        .await;

        let mut report = SettleReport::default();
        let mut finished = Vec::new();
        for (event, outcome) in outcomes {
            let operation = event.kind().as_str();
            match outcome {
                Ok(Resolution::Finalized(done)) => {
                    self.metrics
                        .record_call(operation, done.duration, !done.is_error());
                    finished.push(done);
                    report.finalized += 1;
                }
                Ok(Resolution::Abandoned) => {
                    tracing::warn!(
                        event_id = %event.id(),
                        topic = %event.resource_name(),
                        "callback dropped without completing, event abandoned"
                    );
                    self.metrics.record_abandoned(operation);
                    report.abandoned += 1;
                }
                Err(_) => {
                    tracing::warn!(
                        event_id = %event.id(),
                        topic = %event.resource_name(),
                        timeout_ms = wait.as_millis() as u64,
                        "event did not complete in time"
                    );
                    self.metrics.record_timeout(operation);
                    report.timed_out += 1;
                }
            }
        }

        let mut state = self.state();
        for event in finished {
            if state.finished.len() >= self.config.max_events {
                state.finished.pop_front();
            }
            state.finished.push_back(event);
        }

        tracing::debug!(
            finalized = report.finalized,
            abandoned = report.abandoned,
            timed_out = report.timed_out,
            "tracer settled"
        );
        report
    }

    /// Drain the buffered finalized events.
    pub fn take_events(&self) -> Vec<TraceEvent> {
        self.state().finished.drain(..).collect()
    }

    /// Drain the reported instrumentation failures.
    pub fn take_exceptions(&self) -> Vec<InstrumentationError> {
        self.state().exceptions.drain(..).collect()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Settle outstanding events, then export the buffer.
    ///
    /// On export failure the events stay buffered for the next flush.
    pub async fn flush(&self, exporter: &dyn Exporter) -> Result<SettleReport, ExportError> {
        let report = self.settle().await;
        let events = self.take_events();
        if events.is_empty() {
            return Ok(report);
        }

        if let Err(err) = exporter.export(&events).await {
            let mut state = self.state();
            for event in events.into_iter().rev() {
                state.finished.push_front(event);
            }
            while state.finished.len() > self.config.max_events {
                state.finished.pop_front();
            }
            return Err(err);
        }

        Ok(report)
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(TracerConfig::default())
    }
}

impl TraceSink for Tracer {
    fn add_event(&self, event: &PendingEvent, signal: CompletionSignal) -> Result<(), TracerError> {
        let mut state = self.state();
        if state.closed {
            return Err(TracerError::Closed);
        }
        if state.pending.len() >= self.config.max_pending {
            return Err(TracerError::Full {
                limit: self.config.max_pending,
            });
        }
        state.pending.push(Registration {
            event: event.clone(),
            signal,
        });
        Ok(())
    }

    fn add_exception(&self, error: InstrumentationError) {
        self.metrics.record_exception();
        let mut state = self.state();
        if state.exceptions.len() >= self.config.max_events {
            state.exceptions.pop_front();
        }
        state.exceptions.push_back(error);
    }

    fn metadata_only(&self) -> bool {
        self.config.metadata_only
    }
}
