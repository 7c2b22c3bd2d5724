//! Trace event records.
//!
//! An event starts life as a [`PendingEvent`] when a call is intercepted and
//! becomes a [`TraceEvent`] once the call's completion callback fires. The
//! transition consumes the pending value, so an event can only be finalized
//! once.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};

use super::id::EventId;
use crate::client::{ClientError, ClientOptions, Message};

/// Vendor identifier stamped on every event
pub const VENDOR: &str = "mqtt";

/// Kind of intercepted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Publish,
    Subscribe,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Publish => "publish",
            OperationKind::Subscribe => "subscribe",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection attributes captured at call start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestMetadata {
    pub region: Option<String>,
    pub protocol: Option<String>,
    pub host: Option<String>,
}

impl RequestMetadata {
    /// Read the connection attributes of a client.
    pub fn from_options(options: &ClientOptions) -> Self {
        Self {
            region: options.region.clone(),
            protocol: options.protocol.clone(),
            host: options.host.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    client_id: Option<&'a str>,
    protocol_id: Option<&'a str>,
    protocol_version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a Message>,
}

/// Build the payload attached to an event.
///
/// The payload is assembled from request-time state (client identity and the
/// outgoing message), not from whatever the broker eventually answers.
pub fn build_payload(
    options: &ClientOptions,
    message: Option<&Message>,
) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(Payload {
        client_id: options.client_id.as_deref(),
        protocol_id: options.protocol_id.as_deref(),
        protocol_version: options.protocol_version,
        message,
    })
}

/// An event in START state
#[derive(Debug, Clone)]
pub struct PendingEvent {
    pub(crate) id: EventId,
    pub(crate) kind: OperationKind,
    pub(crate) operation: String,
    pub(crate) vendor: String,
    pub(crate) resource_name: String,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) started: Instant,
}

impl PendingEvent {
    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Time elapsed since the call was intercepted.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A finalized event
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub id: EventId,
    pub kind: OperationKind,
    pub operation: String,
    pub vendor: String,
    pub resource_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ClientError>,
    pub request_metadata: RequestMetadata,
    pub response_payload: serde_json::Value,
}

impl TraceEvent {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

fn serialize_error<S: Serializer>(
    error: &Option<ClientError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
