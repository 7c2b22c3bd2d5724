//! Criterion benchmarks for publish overhead
//!
//! Compares a raw client against one wrapped with tracing.
//!
//! Run with: cargo bench
//! Results are saved in target/criterion/ for comparison

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use mqtt_tracer::client::{ClientOptions, Completion, MqttClient, Packet, PublishOptions};
use mqtt_tracer::instrument::{wrap_constructor, CompletionSignal, Constructor, InstrumentationError};
use mqtt_tracer::trace::PendingEvent;
use mqtt_tracer::tracer::{TraceSink, TracerError};

/// Accepts every event and drops its signal immediately.
struct DiscardSink;

impl TraceSink for DiscardSink {
    fn add_event(&self, _: &PendingEvent, _: CompletionSignal) -> Result<(), TracerError> {
        Ok(())
    }

    fn add_exception(&self, _: InstrumentationError) {}
}

fn loopback(_: (), options: ClientOptions) -> MqttClient {
    MqttClient::new(options)
        .with_publish(|_, _, _, _, callback| {
            if let Some(callback) = callback {
                callback(Ok(None));
            }
            Ok(Some(1))
        })
        .with_subscribe(|_, _, _, callback| {
            if let Some(callback) = callback {
                callback(Ok(Vec::new()));
            }
            Ok(None)
        })
}

fn options() -> ClientOptions {
    ClientOptions {
        host: Some("broker.local".to_string()),
        client_id: Some("bench".to_string()),
        protocol_version: Some(4),
        ..Default::default()
    }
}

fn bench_publish(c: &mut Criterion) {
    let raw: Constructor<()> = Arc::new(loopback);
    let traced = wrap_constructor(Arc::clone(&raw), Arc::new(DiscardSink));

    let raw_client = raw((), options());
    let traced_client = traced((), options());

    let mut group = c.benchmark_group("publish");

    group.bench_function("raw", |b| {
        b.iter(|| {
            raw_client.publish(
                black_box("sensors/temp"),
                "21.5",
                PublishOptions::default(),
                Some(Box::new(|done: Completion<Option<Packet>>| {
                    black_box(done);
                })),
            )
        })
    });

    group.bench_function("traced", |b| {
        b.iter(|| {
            traced_client.publish(
                black_box("sensors/temp"),
                "21.5",
                PublishOptions::default(),
                Some(Box::new(|done: Completion<Option<Packet>>| {
                    black_box(done);
                })),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_publish);
criterion_main!(benches);
