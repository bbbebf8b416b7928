//! ROS interface for the console
//!
//! The console never owns a socket. It talks to the robot through the
//! [`Bridge`] trait:
//! - publishing messages and subscribing to topics
//! - calling services, whose replies come back later as
//!   [`BridgeEvent::ServiceResponse`] carrying the same [`RequestId`]
//!
//! [`RosbridgeClient`] implements the trait on top of rosbridge v2 JSON frames.

mod publisher;
mod rosapi;
mod rosbridge;
mod subscriber;

use serde_json::Value;

pub use publisher::*;
pub use rosapi::*;
pub use rosbridge::*;
pub use subscriber::*;

/// Identifies a service call so its asynchronous reply can be routed
pub type RequestId = u64;

/// Outgoing side of the middleware connection
pub trait Bridge {
    /// Publish `msg` (already encoded) on `topic`
    fn publish(&mut self, topic: &str, msg_type: &str, msg: Value) -> Result<(), RosError>;

    /// Start receiving `topic`; `throttle_rate` is the minimum period in ms (0 = none)
    fn subscribe(&mut self, topic: &str, msg_type: &str, throttle_rate: u32) -> Result<(), RosError>;

    /// Call a service. The reply, if it ever comes, is delivered as a
    /// [`BridgeEvent::ServiceResponse`] with the returned id.
    fn call_service(&mut self, service: &str, args: Value) -> Result<RequestId, RosError>;
}

/// State of the underlying connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Link is up
    Connected,
    /// Connection attempt or link failed
    Error(String),
    /// Link closed by either side
    Closed,
}

/// Inbound traffic from the bridge
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// Connection state changed
    Connection(ConnectionState),
    /// A message on a subscribed topic
    Message {
        /// Topic the message arrived on
        topic: String,
        /// Undecoded payload
        msg: Value,
    },
    /// Reply to an earlier [`Bridge::call_service`]
    ServiceResponse {
        /// Id returned by the call
        id: RequestId,
        /// Whether the service succeeded
        result: bool,
        /// Response fields
        values: Value,
    },
}

/// ROS error types
#[derive(Debug)]
pub enum RosError {
    /// Publishing error
    PublishError(String),
    /// Subscription error
    SubscribeError(String),
    /// Service call error
    ServiceError(String),
    /// Message conversion error
    ConversionError(String),
    /// Frame not understood by the rosbridge codec
    ProtocolError(String),
}

impl std::fmt::Display for RosError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RosError::PublishError(msg) => write!(f, "Publish error: {}", msg),
            RosError::SubscribeError(msg) => write!(f, "Subscribe error: {}", msg),
            RosError::ServiceError(msg) => write!(f, "Service error: {}", msg),
            RosError::ConversionError(msg) => write!(f, "Conversion error: {}", msg),
            RosError::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
        }
    }
}

impl std::error::Error for RosError {}

impl From<serde_json::Error> for RosError {
    fn from(err: serde_json::Error) -> Self {
        RosError::ConversionError(err.to_string())
    }
}
