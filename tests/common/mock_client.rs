//! Mock broker-backed MQTT client.
//!
//! Operations record their arguments and hold on to the callback they were
//! given, so tests decide when (and whether) each call completes, just like
//! a real client waiting on network I/O.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use mqtt_tracer::client::{
    ClientOptions, Completion, Grant, Message, MqttClient, Packet, PublishCallback,
    PublishOptions, SubscribeCallback, SubscribeOptions,
};
use mqtt_tracer::instrument::Constructor;

/// A publish call as seen by the client library.
pub struct PublishCall {
    pub topic: String,
    pub message: Message,
    pub options: PublishOptions,
    pub had_callback: bool,
    callback: Option<PublishCallback>,
}

/// A subscribe call as seen by the client library.
pub struct SubscribeCall {
    pub topic: String,
    pub options: SubscribeOptions,
    pub had_callback: bool,
    callback: Option<SubscribeCallback>,
}

/// Stands in for the network side of a client.
#[derive(Default)]
pub struct MockBroker {
    publishes: Mutex<Vec<PublishCall>>,
    subscribes: Mutex<Vec<SubscribeCall>>,
    next_id: AtomicU16,
}

impl MockBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.lock().unwrap().len()
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.lock().unwrap().len()
    }

    /// Inspect a recorded publish call.
    pub fn with_publish<R>(&self, index: usize, f: impl FnOnce(&PublishCall) -> R) -> R {
        f(&self.publishes.lock().unwrap()[index])
    }

    /// Inspect a recorded subscribe call.
    pub fn with_subscribe<R>(&self, index: usize, f: impl FnOnce(&SubscribeCall) -> R) -> R {
        f(&self.subscribes.lock().unwrap()[index])
    }

    /// Fire the callback of a publish call. Returns false if none was given.
    pub fn complete_publish(&self, index: usize, completion: Completion<Option<Packet>>) -> bool {
        let callback = self.publishes.lock().unwrap()[index].callback.take();
        match callback {
            Some(callback) => {
                callback(completion);
                true
            }
            None => false,
        }
    }

    /// Fire the callback of a subscribe call. Returns false if none was given.
    pub fn complete_subscribe(&self, index: usize, completion: Completion<Vec<Grant>>) -> bool {
        let callback = self.subscribes.lock().unwrap()[index].callback.take();
        match callback {
            Some(callback) => {
                callback(completion);
                true
            }
            None => false,
        }
    }

    /// Drop a publish callback without ever calling it.
    pub fn forget_publish(&self, index: usize) {
        self.publishes.lock().unwrap()[index].callback.take();
    }

    fn next_message_id(&self) -> u16 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Build a client whose operations are served by `broker`.
pub fn build_client(broker: Arc<MockBroker>, options: ClientOptions) -> MqttClient {
    let publisher = Arc::clone(&broker);
    let subscriber = broker;

    MqttClient::new(options)
        .with_publish(move |_, topic, message, options, callback| {
            let id = publisher.next_message_id();
            publisher.publishes.lock().unwrap().push(PublishCall {
                topic: topic.to_string(),
                message,
                options,
                had_callback: callback.is_some(),
                callback,
            });
            Ok(Some(id))
        })
        .with_subscribe(move |_, topic, options, callback| {
            let id = subscriber.next_message_id();
            subscriber.subscribes.lock().unwrap().push(SubscribeCall {
                topic: topic.to_string(),
                options,
                had_callback: callback.is_some(),
                callback,
            });
            Ok(Some(id))
        })
}

/// Constructor taking the broker as its stream builder.
pub fn mock_constructor() -> Constructor<Arc<MockBroker>> {
    Arc::new(build_client)
}

/// Connection options used across scenarios.
pub fn scenario_options() -> ClientOptions {
    ClientOptions {
        region: Some("eu".to_string()),
        protocol: Some("mqtt".to_string()),
        host: Some("h".to_string()),
        client_id: Some("c1".to_string()),
        protocol_id: Some("MQTT".to_string()),
        protocol_version: Some(4),
    }
}
