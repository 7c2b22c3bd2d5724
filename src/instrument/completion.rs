//! Completion tracking for asynchronous calls.
//!
//! A [`CompletionTracker`] travels inside the effective callback handed to
//! the client. Its [`CompletionSignal`] goes to the tracer registry, which
//! awaits it. The pair resolves exactly once: `resolve` consumes the tracker,
//! and dropping an unresolved tracker resolves the signal as abandoned.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::trace::{EventId, TraceEvent};

/// How a tracked call ended, as seen by the registry
#[derive(Debug)]
pub enum Resolution {
    /// The callback fired and the event was finalized
    Finalized(TraceEvent),
    /// The callback was dropped without firing
    Abandoned,
}

impl Resolution {
    pub fn is_finalized(&self) -> bool {
        matches!(self, Resolution::Finalized(_))
    }
}

/// Resolving half, owned by the effective callback
#[derive(Debug)]
pub struct CompletionTracker {
    event_id: EventId,
    tx: oneshot::Sender<TraceEvent>,
}

/// Awaiting half, owned by the tracer registry
#[derive(Debug)]
pub struct CompletionSignal {
    event_id: EventId,
    rx: oneshot::Receiver<TraceEvent>,
}

impl CompletionTracker {
    /// Create a tracker/signal pair for one event.
    pub fn new(event_id: EventId) -> (CompletionTracker, CompletionSignal) {
        let (tx, rx) = oneshot::channel();
        (
            CompletionTracker {
                event_id: event_id.clone(),
                tx,
            },
            CompletionSignal { event_id, rx },
        )
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Resolve with the finalized event.
    ///
    /// Returns false when the registry has already stopped waiting.
    pub fn resolve(self, event: TraceEvent) -> bool {
        let delivered = self.tx.send(event).is_ok();
        if !delivered {
            tracing::debug!(event_id = %self.event_id, "registry no longer awaiting event");
        }
        delivered
    }
}

impl CompletionSignal {
    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Non-blocking check, `None` while the call is still in flight.
    pub fn try_resolution(&mut self) -> Option<Resolution> {
        match self.rx.try_recv() {
            Ok(event) => Some(Resolution::Finalized(event)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Resolution::Abandoned),
        }
    }
}

impl Future for CompletionSignal {
    type Output = Resolution;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(event) => Resolution::Finalized(event),
            Err(_) => Resolution::Abandoned,
        })
    }
}
