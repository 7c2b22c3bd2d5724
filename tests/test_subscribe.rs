//! Integration tests for subscribe interception.

mod common;

use std::sync::{Arc, Mutex};

use mqtt_tracer::client::{ClientError, Completion, Grant, QoS, SubscribeOptions};
use mqtt_tracer::instrument::wrap_constructor;
use mqtt_tracer::trace::OperationKind;
use mqtt_tracer::tracer::{Tracer, TracerConfig};

use common::assertions::{assert_event, assert_outcome};
use common::mock_client::{mock_constructor, scenario_options, MockBroker};

#[tokio::test]
async fn test_subscribe_forwards_grants() {
    let tracer = Arc::new(Tracer::new(TracerConfig::default()));
    let connect = wrap_constructor(mock_constructor(), tracer.clone());
    let broker = MockBroker::new();
    let client = connect(Arc::clone(&broker), scenario_options());

    let received: Arc<Mutex<Option<Completion<Vec<Grant>>>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&received);
    let dispatch = client.subscribe(
        "sensors/#",
        SubscribeOptions {
            qos: QoS::ExactlyOnce,
        },
        Some(Box::new(move |completion: Completion<Vec<Grant>>| {
            *slot.lock().unwrap() = Some(completion)
        })),
    );
    assert_eq!(dispatch, Ok(Some(1)));
    broker.with_subscribe(0, |call| {
        assert_eq!(call.topic, "sensors/#");
        assert_eq!(call.options.qos, QoS::ExactlyOnce);
    });

    let grants = vec![Grant {
        topic: "sensors/#".to_string(),
        qos: QoS::AtLeastOnce,
    }];
    broker.complete_subscribe(0, Ok(grants.clone()));
    assert_eq!(*received.lock().unwrap(), Some(Ok(grants)));

    tracer.settle().await;
    let events = tracer.take_events();
    assert_event(&events[0], OperationKind::Subscribe, "sensors/#");
    assert_outcome(&events[0], None);
    assert!(events[0].response_payload.get("message").is_none());
    assert_eq!(events[0].response_payload["clientId"], "c1");
}

#[tokio::test]
async fn test_subscribe_without_callback() {
    let tracer = Arc::new(Tracer::new(TracerConfig::default()));
    let connect = wrap_constructor(mock_constructor(), tracer.clone());
    let broker = MockBroker::new();
    let client = connect(Arc::clone(&broker), scenario_options());

    client
        .subscribe("topic/b", SubscribeOptions::default(), None)
        .unwrap();

    let refused = ClientError::Protocol("not authorized".to_string());
    assert!(broker.complete_subscribe(0, Err(refused.clone())));

    tracer.settle().await;
    let events = tracer.take_events();
    assert_eq!(events.len(), 1);
    assert_event(&events[0], OperationKind::Subscribe, "topic/b");
    assert_outcome(&events[0], Some(&refused));
}
