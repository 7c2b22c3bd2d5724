//! MQTT client seam
//!
//! A client is a struct of function-valued operations. Instrumentation swaps
//! `publish` and `subscribe` on a constructed instance through
//! [`MqttClient::wrap_publish`] and [`MqttClient::wrap_subscribe`], so the
//! library that built the client is never touched.

mod types;

pub use types::*;

use std::sync::Arc;
use thiserror::Error;

/// Errors produced by the messaging library itself
///
/// These are application-domain failures: they are delivered to callers
/// verbatim and copied into trace events, never created by instrumentation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Client is disconnecting")]
    Disconnecting,

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

/// Outcome delivered to a completion callback
pub type Completion<T> = Result<T, ClientError>;

/// One-shot completion callback
pub type Callback<T> = Box<dyn FnOnce(Completion<T>) + Send + 'static>;

pub type PublishCallback = Callback<Option<Packet>>;
pub type SubscribeCallback = Callback<Vec<Grant>>;

/// Synchronous result of handing a packet to the client (the queued packet id)
pub type Dispatch = Result<Option<u16>, ClientError>;

/// `publish(options, topic, message, options, callback)`
pub type PublishFn = Arc<
    dyn Fn(&ClientOptions, &str, Message, PublishOptions, Option<PublishCallback>) -> Dispatch
        + Send
        + Sync,
>;

/// `subscribe(options, topic, options, callback)`
pub type SubscribeFn = Arc<
    dyn Fn(&ClientOptions, &str, SubscribeOptions, Option<SubscribeCallback>) -> Dispatch
        + Send
        + Sync,
>;

/// Operations that instrumentation can replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Publish,
    Subscribe,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Publish => "publish",
            Method::Subscribe => "subscribe",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned by the wrapping primitive when the instance lacks an operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("client has no `{0}` operation to wrap")]
pub struct MissingMethod(pub Method);

/// A constructed MQTT client instance
pub struct MqttClient {
    options: ClientOptions,
    publish: Option<PublishFn>,
    subscribe: Option<SubscribeFn>,
}

impl MqttClient {
    /// Create a client with no operations installed.
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            publish: None,
            subscribe: None,
        }
    }

    /// Install the publish operation.
    pub fn with_publish<F>(mut self, publish: F) -> Self
    where
        F: Fn(&ClientOptions, &str, Message, PublishOptions, Option<PublishCallback>) -> Dispatch
            + Send
            + Sync
            + 'static,
    {
        self.publish = Some(Arc::new(publish));
        self
    }

    /// Install the subscribe operation.
    pub fn with_subscribe<F>(mut self, subscribe: F) -> Self
    where
        F: Fn(&ClientOptions, &str, SubscribeOptions, Option<SubscribeCallback>) -> Dispatch
            + Send
            + Sync
            + 'static,
    {
        self.subscribe = Some(Arc::new(subscribe));
        self
    }

    /// Connection configuration of this instance.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Whether the given operation is installed.
    pub fn has_method(&self, method: Method) -> bool {
        match method {
            Method::Publish => self.publish.is_some(),
            Method::Subscribe => self.subscribe.is_some(),
        }
    }

    /// Publish a message to a topic.
    pub fn publish(
        &self,
        topic: &str,
        message: impl Into<Message>,
        options: PublishOptions,
        callback: Option<PublishCallback>,
    ) -> Dispatch {
        match &self.publish {
            Some(publish) => publish(&self.options, topic, message.into(), options, callback),
            None => Err(ClientError::Unsupported(Method::Publish.as_str())),
        }
    }

    /// Subscribe to a topic.
    pub fn subscribe(
        &self,
        topic: &str,
        options: SubscribeOptions,
        callback: Option<SubscribeCallback>,
    ) -> Dispatch {
        match &self.subscribe {
            Some(subscribe) => subscribe(&self.options, topic, options, callback),
            None => Err(ClientError::Unsupported(Method::Subscribe.as_str())),
        }
    }

    /// Replace the publish operation with `wrapper(original)`.
    pub fn wrap_publish<W>(&mut self, wrapper: W) -> Result<(), MissingMethod>
    where
        W: FnOnce(PublishFn) -> PublishFn,
    {
        let original = self
            .publish
            .take()
            .ok_or(MissingMethod(Method::Publish))?;
        self.publish = Some(wrapper(original));
        Ok(())
    }

    /// Replace the subscribe operation with `wrapper(original)`.
    pub fn wrap_subscribe<W>(&mut self, wrapper: W) -> Result<(), MissingMethod>
    where
        W: FnOnce(SubscribeFn) -> SubscribeFn,
    {
        let original = self
            .subscribe
            .take()
            .ok_or(MissingMethod(Method::Subscribe))?;
        self.subscribe = Some(wrapper(original));
        Ok(())
    }
}

impl std::fmt::Debug for MqttClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttClient")
            .field("options", &self.options)
            .field("publish", &self.publish.is_some())
            .field("subscribe", &self.subscribe.is_some())
            .finish()
    }
}
