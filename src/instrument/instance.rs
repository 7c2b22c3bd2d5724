//! Client construction interception.

use std::sync::Arc;

use super::error::InstrumentationError;
use super::guard::isolate;
use super::interceptor::{wrap_publish, wrap_subscribe};
use crate::client::{ClientOptions, Method, MissingMethod, MqttClient};
use crate::tracer::{TraceSink, GLOBAL_TRACER};

/// Client constructor: `(stream_builder, options) -> client`
pub type Constructor<S> = Arc<dyn Fn(S, ClientOptions) -> MqttClient + Send + Sync>;

/// Wrap a constructor so that every client it builds is instrumented.
///
/// Arguments are forwarded untouched. The client is returned even when
/// instrumentation could not be installed.
pub fn wrap_constructor<S>(original: Constructor<S>, sink: Arc<dyn TraceSink>) -> Constructor<S>
where
    S: 'static,
{
    Arc::new(move |stream_builder: S, options: ClientOptions| {
        let mut client = original(stream_builder, options);
        instrument_client(&mut client, Arc::clone(&sink));
        client
    })
}

/// Wrap a constructor with the process-wide tracer.
pub fn init<S>(original: Constructor<S>) -> Constructor<S>
where
    S: 'static,
{
    let sink: Arc<dyn TraceSink> = GLOBAL_TRACER.clone();
    wrap_constructor(original, sink)
}

/// Install the interceptors on an existing client.
///
/// All-or-nothing: if either operation is missing the client is left as it
/// was and the failure is reported. Returns whether tracing was installed.
pub fn instrument_client(client: &mut MqttClient, sink: Arc<dyn TraceSink>) -> bool {
    let installed = isolate(sink.as_ref(), || {
        for method in [Method::Publish, Method::Subscribe] {
            if !client.has_method(method) {
                return Err(InstrumentationError::from(MissingMethod(method)));
            }
        }
        client.wrap_publish(|original| wrap_publish(original, Arc::clone(&sink)))?;
        client.wrap_subscribe(|original| wrap_subscribe(original, Arc::clone(&sink)))?;
        Ok(())
    });

    if installed.is_some() {
        tracing::debug!(
            client_id = client.options().client_id.as_deref().unwrap_or(""),
            "mqtt client instrumented"
        );
    }
    installed.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{PublishOptions, SubscribeOptions};
    use crate::tracer::{Tracer, TracerConfig};

    fn full_client(_: (), options: ClientOptions) -> MqttClient {
        MqttClient::new(options)
            .with_publish(|_, _, _, _, cb| {
                if let Some(cb) = cb {
                    cb(Ok(None));
                }
                Ok(Some(3))
            })
            .with_subscribe(|_, _, _, cb| {
                if let Some(cb) = cb {
                    cb(Ok(vec![]));
                }
                Ok(None)
            })
    }

    #[test]
    fn test_constructed_clients_are_traced() {
        let tracer = Arc::new(Tracer::new(TracerConfig::default()));
        let ctor: Constructor<()> = Arc::new(full_client);
        let ctor = wrap_constructor(ctor, tracer.clone());

        let client = ctor((), ClientOptions::default());
        assert_eq!(
            client.publish("a", "m", PublishOptions::default(), None),
            Ok(Some(3))
        );
        client
            .subscribe("a", SubscribeOptions::default(), None)
            .unwrap();

        assert_eq!(tracer.pending_count(), 2);
    }

    #[test]
    fn test_partial_client_left_unmodified() {
        let tracer = Arc::new(Tracer::new(TracerConfig::default()));
        let ctor: Constructor<()> = Arc::new(|_: (), options: ClientOptions| {
            MqttClient::new(options).with_publish(|_, _, _, _, _| Ok(Some(9)))
        });
        let ctor = wrap_constructor(ctor, tracer.clone());

        let client = ctor((), ClientOptions::default());
        assert_eq!(
            client.publish("a", "m", PublishOptions::default(), None),
            Ok(Some(9))
        );
        assert_eq!(tracer.pending_count(), 0);
        assert_eq!(tracer.take_exceptions().len(), 1);
    }
}
