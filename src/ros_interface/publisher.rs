// src/ros_interface/publisher.rs
// Topic publishers and the encoders for every message the console sends.

use serde_json::{json, Value};

use super::{Bridge, RosError};
use crate::core::geometry::{yaw_to_quaternion, Pose2D};

/// Velocity command
pub const TWIST_TYPE: &str = "geometry_msgs/Twist";
/// Mode and sound codes
pub const UINT16_TYPE: &str = "std_msgs/UInt16";
/// Soft emergency stop request
pub const BOOL_TYPE: &str = "std_msgs/Bool";
/// Action cancel request
pub const GOAL_ID_TYPE: &str = "actionlib_msgs/GoalID";
/// Navigation goal
pub const MOVE_BASE_GOAL_TYPE: &str = "move_base_msgs/MoveBaseActionGoal";
/// Transform subscription goal for the tf2 web republisher
pub const TF_SUBSCRIPTION_GOAL_TYPE: &str = "tf2_web_republisher/TFSubscriptionActionGoal";

/// Sound mode codes understood by the robot driver on its mode topic
pub const MODE_SOUND_DOUBLE_BEEP: u16 = 1028;
/// Long beep, played when a goal is sent
pub const MODE_SOUND_LONG_BEEP: u16 = 1029;

/// A topic the console publishes to
#[derive(Debug, Clone, PartialEq)]
pub struct Publisher {
    topic: String,
    msg_type: &'static str,
}

impl Publisher {
    /// Publisher of `msg_type` messages on `topic`
    pub fn new(topic: &str, msg_type: &'static str) -> Self {
        Publisher {
            topic: topic.to_string(),
            msg_type,
        }
    }

    /// Topic name
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish a message to the topic
    pub fn publish(&self, bridge: &mut dyn Bridge, message: Value) -> Result<(), RosError> {
        bridge.publish(&self.topic, self.msg_type, message)
    }
}

/// Planar velocity command
pub fn twist(linear: f64, angular: f64) -> Value {
    json!({
        "linear": {"x": linear, "y": 0.0, "z": 0.0},
        "angular": {"x": 0.0, "y": 0.0, "z": angular},
    })
}

/// `std_msgs/UInt16`
pub fn uint16(data: u16) -> Value {
    json!({ "data": data })
}

/// `std_msgs/Bool`
pub fn bool_msg(data: bool) -> Value {
    json!({ "data": data })
}

fn zero_stamp() -> Value {
    json!({"secs": 0, "nsecs": 0})
}

/// Action goal id, also the payload of an action cancel request
pub fn goal_id(id: &str) -> Value {
    json!({ "stamp": zero_stamp(), "id": id })
}

/// `move_base` action goal targeting `pose` in `frame_id`
pub fn move_base_goal(id: &str, frame_id: &str, pose: &Pose2D) -> Value {
    let orientation = yaw_to_quaternion(pose.theta);
    json!({
        "header": {"seq": 0, "stamp": zero_stamp(), "frame_id": ""},
        "goal_id": goal_id(id),
        "goal": {
            "target_pose": {
                "header": {"seq": 0, "stamp": zero_stamp(), "frame_id": frame_id},
                "pose": {
                    "position": {"x": pose.x, "y": pose.y, "z": 0.0},
                    "orientation": orientation,
                },
            },
        },
    })
}

/// Request for a stream of transforms of `source_frames` relative to `target_frame`
pub fn tf_subscription_goal(
    id: &str,
    source_frames: &[String],
    target_frame: &str,
    angular_thres: f64,
    trans_thres: f64,
    rate: f64,
) -> Value {
    json!({
        "header": {"seq": 0, "stamp": zero_stamp(), "frame_id": ""},
        "goal_id": goal_id(id),
        "goal": {
            "source_frames": source_frames,
            "target_frame": target_frame,
            "angular_thres": angular_thres,
            "trans_thres": trans_thres,
            "rate": rate,
        },
    })
}
