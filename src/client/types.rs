//! Shared types for MQTT clients

use serde::{Deserialize, Serialize};

/// Connection configuration owned by a client instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Deployment region of the broker
    pub region: Option<String>,
    /// Transport protocol (mqtt, mqtts, ws, wss)
    pub protocol: Option<String>,
    /// Broker host name
    pub host: Option<String>,
    /// Client identifier sent in CONNECT
    pub client_id: Option<String>,
    /// Protocol name sent in CONNECT (usually "MQTT")
    pub protocol_id: Option<String>,
    /// Protocol level (4 = 3.1.1, 5 = 5.0)
    pub protocol_version: Option<u8>,
}

/// MQTT quality of service level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QoS {
    #[default]
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl QoS {
    /// Numeric level as carried on the wire
    pub fn level(&self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

impl std::fmt::Display for QoS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "qos{}", self.level())
    }
}

/// Options for a publish call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOptions {
    pub qos: QoS,
    pub retain: bool,
    pub dup: bool,
}

impl PublishOptions {
    pub fn with_qos(qos: QoS) -> Self {
        Self {
            qos,
            ..Self::default()
        }
    }
}

/// Options for a subscribe call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeOptions {
    pub qos: QoS,
}

/// Application message handed to publish
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<Vec<u8>> for Message {
    fn from(bytes: Vec<u8>) -> Self {
        Message::Bytes(bytes)
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        Message::Json(value)
    }
}

/// Acknowledgement packet delivered to a publish callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Packet identifier (absent for QoS 0)
    pub message_id: Option<u16>,
    pub qos: QoS,
}

/// Subscription granted by the broker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub topic: String,
    pub qos: QoS,
}
