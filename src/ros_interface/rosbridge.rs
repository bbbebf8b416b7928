// src/ros_interface/rosbridge.rs
// rosbridge v2 protocol codec: operations become JSON text frames queued for the
// websocket writer, inbound frames become BridgeEvents.

use std::collections::{HashSet, VecDeque};

use serde::Deserialize;
use serde_json::{json, Value};

use super::{Bridge, BridgeEvent, RequestId, RosError};

/// [`Bridge`] that queues rosbridge frames in an outbox
#[derive(Debug, Default)]
pub struct RosbridgeClient {
    outbox: VecDeque<String>,
    advertised: HashSet<String>,
    id_counter: RequestId,
}

#[derive(Deserialize)]
struct InboundFrame {
    op: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    msg: Value,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    values: Value,
    #[serde(default)]
    result: Option<bool>,
    #[serde(default)]
    level: Option<String>,
}

impl RosbridgeClient {
    /// Client with an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> RequestId {
        self.id_counter += 1;
        self.id_counter
    }

    fn push(&mut self, frame: Value) -> Result<(), RosError> {
        let text = serde_json::to_string(&frame)?;
        log::trace!("-> {}", text);
        self.outbox.push_back(text);
        Ok(())
    }

    /// Take every frame queued so far, oldest first
    pub fn drain_outgoing(&mut self) -> Vec<String> {
        self.outbox.drain(..).collect()
    }

    /// Frames waiting for the writer
    pub fn pending_frames(&self) -> usize {
        self.outbox.len()
    }

    /// Decode one inbound frame. Status frames and other ops the console does
    /// not consume decode to `None`.
    pub fn decode(frame: &str) -> Result<Option<BridgeEvent>, RosError> {
        let frame: InboundFrame = serde_json::from_str(frame)?;
        match frame.op.as_str() {
            "publish" => {
                let topic = frame
                    .topic
                    .ok_or_else(|| RosError::ProtocolError("publish frame without topic".to_string()))?;
                Ok(Some(BridgeEvent::Message { topic, msg: frame.msg }))
            }
            "service_response" => {
                let raw_id = frame.id.ok_or_else(|| {
                    RosError::ProtocolError("service_response frame without id".to_string())
                })?;
                let id = raw_id
                    .rsplit(':')
                    .next()
                    .and_then(|n| n.parse::<RequestId>().ok())
                    .ok_or_else(|| RosError::ProtocolError(format!("unknown request id {}", raw_id)))?;
                Ok(Some(BridgeEvent::ServiceResponse {
                    id,
                    result: frame.result.unwrap_or(true),
                    values: frame.values,
                }))
            }
            "status" => {
                log::debug!(
                    "rosbridge status ({}): {}",
                    frame.level.as_deref().unwrap_or("info"),
                    frame.msg
                );
                Ok(None)
            }
            other => {
                log::warn!("Ignoring rosbridge op {}", other);
                Ok(None)
            }
        }
    }
}

impl Bridge for RosbridgeClient {
    fn publish(&mut self, topic: &str, msg_type: &str, msg: Value) -> Result<(), RosError> {
        if !self.advertised.contains(topic) {
            let n = self.next_id();
            self.push(json!({
                "op": "advertise",
                "id": format!("advertise:{}:{}", topic, n),
                "topic": topic,
                "type": msg_type,
            }))
            .map_err(|e| RosError::PublishError(e.to_string()))?;
            self.advertised.insert(topic.to_string());
        }
        self.push(json!({"op": "publish", "topic": topic, "msg": msg}))
            .map_err(|e| RosError::PublishError(e.to_string()))
    }

    fn subscribe(&mut self, topic: &str, msg_type: &str, throttle_rate: u32) -> Result<(), RosError> {
        let n = self.next_id();
        self.push(json!({
            "op": "subscribe",
            "id": format!("subscribe:{}:{}", topic, n),
            "type": msg_type,
            "topic": topic,
            "throttle_rate": throttle_rate,
        }))
        .map_err(|e| RosError::SubscribeError(e.to_string()))
    }

    fn call_service(&mut self, service: &str, args: Value) -> Result<RequestId, RosError> {
        let n = self.next_id();
        self.push(json!({
            "op": "call_service",
            "id": format!("call_service:{}:{}", service, n),
            "service": service,
            "args": args,
        }))
        .map_err(|e| RosError::ServiceError(e.to_string()))?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_publish_advertises_topic() {
        let mut client = RosbridgeClient::new();
        client.publish("/cmd_vel", "geometry_msgs/Twist", json!({})).unwrap();
        client.publish("/cmd_vel", "geometry_msgs/Twist", json!({})).unwrap();
        let frames = client.drain_outgoing();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].contains("\"op\":\"advertise\""));
        assert!(frames[2].contains("\"op\":\"publish\""));
    }

    #[test]
    fn service_response_id_round_trips() {
        let mut client = RosbridgeClient::new();
        let id = client.call_service("/exit_charging_station", json!({})).unwrap();
        let reply = format!(
            r#"{{"op":"service_response","id":"call_service:/exit_charging_station:{}","values":{{"success":true}},"result":true}}"#,
            id
        );
        match RosbridgeClient::decode(&reply).unwrap() {
            Some(BridgeEvent::ServiceResponse { id: got, result, .. }) => {
                assert_eq!(got, id);
                assert!(result);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn status_frames_are_dropped() {
        let frame = r#"{"op":"status","level":"warning","msg":"slow"}"#;
        assert!(RosbridgeClient::decode(frame).unwrap().is_none());
    }
}
