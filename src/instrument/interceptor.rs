//! Publish/subscribe interceptors.
//!
//! Each wrapper starts a trace event, swaps the caller's callback for an
//! effective callback that finalizes the event, and then invokes the original
//! operation with the original arguments. The wrapped call returns exactly
//! what the original returned. Both the original invocation and the effective
//! callback run inside the call's `mqtt_operation` span.

use std::sync::Arc;

use super::completion::CompletionTracker;
use super::error::InstrumentationError;
use super::guard::isolate;
use crate::client::{
    Callback, ClientOptions, Completion, Message, PublishCallback, PublishFn, PublishOptions,
    SubscribeCallback, SubscribeFn, SubscribeOptions,
};
use crate::telemetry::{CallSpan, CallSpanHandle, SpanExt};
use crate::trace::{
    build_payload, EventRecorder, OperationKind, PendingEvent, RequestMetadata, VENDOR,
};
use crate::tracer::TraceSink;

/// State carried from call start to the completion callback
struct TracedCall {
    event: PendingEvent,
    request_metadata: RequestMetadata,
    response_payload: serde_json::Value,
    tracker: CompletionTracker,
    span: CallSpanHandle,
}

impl TracedCall {
    /// Start tracing one call and register it with the tracer.
    fn begin(
        sink: &dyn TraceSink,
        kind: OperationKind,
        topic: &str,
        options: &ClientOptions,
        message: Option<&Message>,
    ) -> Result<Self, InstrumentationError> {
        let event = EventRecorder::initialize(kind, topic, kind.as_str(), VENDOR);
        let request_metadata = RequestMetadata::from_options(options);
        let response_payload = build_payload(options, message)?;
        let (tracker, signal) = CompletionTracker::new(event.id().clone());

        sink.add_event(&event, signal)?;

        let span = CallSpan::new(kind.as_str(), topic, event.id().as_str());
        Ok(Self {
            event,
            request_metadata,
            response_payload,
            tracker,
            span,
        })
    }

    /// Build the callback substituted into the real invocation.
    ///
    /// Order on completion: finalize the event, run the caller's callback
    /// with the untouched completion, then resolve the tracker.
    fn into_callback<T>(self, sink: Arc<dyn TraceSink>, callback: Option<Callback<T>>) -> Callback<T>
    where
        T: Send + 'static,
    {
        Box::new(move |completion: Completion<T>| {
            let TracedCall {
                event,
                request_metadata,
                response_payload,
                tracker,
                span,
            } = self;

            span.in_scope(|| {
                let error = completion.as_ref().err().cloned();
                let finished = isolate(sink.as_ref(), || {
                    span.record_success(error.is_none());
                    span.record_duration_ms(event.elapsed().as_secs_f64() * 1000.0);
                    Ok(EventRecorder::finalize(
                        event,
                        error,
                        request_metadata,
                        response_payload,
                    ))
                });

                if let Some(callback) = callback {
                    callback(completion);
                }

                if let Some(finished) = finished {
                    tracker.resolve(finished);
                }
            })
        })
    }
}

/// Run the original operation inside the call span, if the call is traced.
fn dispatch_in<R>(span: Option<CallSpanHandle>, invoke: impl FnOnce() -> R) -> R {
    match span {
        Some(span) => span.in_scope(invoke),
        None => invoke(),
    }
}

/// Wrap a publish operation with tracing.
pub fn wrap_publish(original: PublishFn, sink: Arc<dyn TraceSink>) -> PublishFn {
    Arc::new(
        move |options: &ClientOptions,
              topic: &str,
              message: Message,
              publish_options: PublishOptions,
              callback: Option<PublishCallback>| {
            let traced = isolate(sink.as_ref(), || {
                let included = if sink.metadata_only() {
                    None
                } else {
                    Some(&message)
                };
                TracedCall::begin(
                    sink.as_ref(),
                    OperationKind::Publish,
                    topic,
                    options,
                    included,
                )
            });

            let span = traced.as_ref().map(|call| call.span.clone());
            let callback = match traced {
                Some(call) => Some(call.into_callback(Arc::clone(&sink), callback)),
                None => callback,
            };

            dispatch_in(span, || {
                original(options, topic, message, publish_options, callback)
            })
        },
    )
}

/// Wrap a subscribe operation with tracing.
pub fn wrap_subscribe(original: SubscribeFn, sink: Arc<dyn TraceSink>) -> SubscribeFn {
    Arc::new(
        move |options: &ClientOptions,
              topic: &str,
              subscribe_options: SubscribeOptions,
              callback: Option<SubscribeCallback>| {
            let traced = isolate(sink.as_ref(), || {
                TracedCall::begin(
                    sink.as_ref(),
                    OperationKind::Subscribe,
                    topic,
                    options,
                    None,
                )
            });

            let span = traced.as_ref().map(|call| call.span.clone());
            let callback = match traced {
                Some(call) => Some(call.into_callback(Arc::clone(&sink), callback)),
                None => callback,
            };

            dispatch_in(span, || original(options, topic, subscribe_options, callback))
        },
    )
}
