// src/ros_interface/subscriber.rs
// Subscriptions and the decoded shapes of every message the console consumes.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{Bridge, RosError};
use crate::core::geometry::{extract_yaw, Pose2D, Quaternion};
use crate::core::map::MapMetadata;
use crate::core::tracking::FrameTransform;

/// Transform feedback from the tf2 web republisher
pub const TF_FEEDBACK_TYPE: &str = "tf2_web_republisher/TFSubscriptionActionFeedback";
/// People tracker output
pub const TRACKED_PERSONS_TYPE: &str = "spencer_tracking_msgs/TrackedPersons";
/// Map changed notification
pub const MAP_STATUS_TYPE: &str = "map_web_republisher/MapStatus";
/// Mower driver sensor bit field
pub const SENSOR_STATUS_TYPE: &str = "am_driver/SensorStatus";
/// Battery flags
pub const BATTERY_STATUS_TYPE: &str = "oru_ipw_msgs/SimpleBatteryStatus";
/// Navigation result
pub const MOVE_BASE_RESULT_TYPE: &str = "move_base_msgs/MoveBaseActionResult";

/// A topic the console listens to
#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    topic: String,
    msg_type: &'static str,
    throttle_rate: u32,
}

impl Subscriber {
    /// Subscription to `topic`; a throttle rate of 0 delivers every message
    pub fn new(topic: &str, msg_type: &'static str, throttle_rate: u32) -> Self {
        Subscriber {
            topic: topic.to_string(),
            msg_type,
            throttle_rate,
        }
    }

    /// Topic name
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// ROS message type
    pub fn msg_type(&self) -> &'static str {
        self.msg_type
    }

    /// Register the subscription with the bridge
    pub fn subscribe(&self, bridge: &mut dyn Bridge) -> Result<(), RosError> {
        bridge.subscribe(&self.topic, self.msg_type, self.throttle_rate)
    }

    /// Whether an inbound message on `topic` belongs here
    pub fn matches(&self, topic: &str) -> bool {
        self.topic == topic
    }
}

/// Decode a message payload
pub fn decode<T: DeserializeOwned>(msg: &Value) -> Result<T, RosError> {
    T::deserialize(msg).map_err(|e| RosError::ConversionError(e.to_string()))
}

/// `geometry_msgs/Vector3`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Vector3 {
    /// X component
    #[serde(default)]
    pub x: f64,
    /// Y component
    #[serde(default)]
    pub y: f64,
    /// Z component
    #[serde(default)]
    pub z: f64,
}

/// ROS time stamp
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Time {
    /// Whole seconds
    #[serde(default)]
    pub secs: u32,
    /// Nanoseconds past `secs`
    #[serde(default)]
    pub nsecs: u32,
}

/// `std_msgs/Header`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    /// Acquisition time
    #[serde(default)]
    pub stamp: Time,
    /// Frame the data is expressed in
    #[serde(default)]
    pub frame_id: String,
}

/// `geometry_msgs/Transform`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TransformMsg {
    /// Offset of the child frame
    pub translation: Vector3,
    /// Rotation of the child frame
    pub rotation: Quaternion,
}

impl From<TransformMsg> for FrameTransform {
    fn from(msg: TransformMsg) -> Self {
        FrameTransform {
            x: msg.translation.x,
            y: msg.translation.y,
            rotation: msg.rotation,
        }
    }
}

/// One transform of the republisher feedback
#[derive(Debug, Clone, Deserialize)]
pub struct TransformStamped {
    /// Frame being located, possibly with a leading slash
    pub child_frame_id: String,
    /// Child pose in the fixed frame
    pub transform: TransformMsg,
}

/// Batch of transforms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TfFeedback {
    /// Transforms in arrival order
    #[serde(default)]
    pub transforms: Vec<TransformStamped>,
}

/// Feedback of the tf2 web republisher action
#[derive(Debug, Clone, Deserialize)]
pub struct TfActionFeedback {
    /// Action feedback body
    pub feedback: TfFeedback,
}

/// `geometry_msgs/Pose`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PoseMsg {
    /// Position
    pub position: Vector3,
    /// Orientation
    pub orientation: Quaternion,
}

impl PoseMsg {
    /// Planar projection using the yaw of the orientation
    pub fn to_pose2d(&self) -> Pose2D {
        Pose2D {
            x: self.position.x,
            y: self.position.y,
            theta: extract_yaw(&self.orientation),
        }
    }
}

/// Pose with the covariance dropped
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PoseWithCovariance {
    /// Mean pose
    pub pose: PoseMsg,
}

/// Single track
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrackedPerson {
    /// Pose in the odometry frame
    pub pose: PoseWithCovariance,
}

/// People tracker output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackedPersons {
    /// Current tracks
    #[serde(default)]
    pub tracks: Vec<TrackedPerson>,
}

impl TrackedPersons {
    /// Poses of the tracks, relative to the odometry frame
    pub fn relative_poses(&self) -> Vec<Pose2D> {
        self.tracks.iter().map(|t| t.pose.pose.to_pose2d()).collect()
    }
}

/// `nav_msgs/MapMetaData`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MapMetaDataMsg {
    /// Metres per cell
    pub resolution: f64,
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// World pose of cell (0, 0)
    pub origin: PoseMsg,
}

impl From<MapMetaDataMsg> for MapMetadata {
    fn from(msg: MapMetaDataMsg) -> Self {
        MapMetadata {
            resolution: msg.resolution,
            width: msg.width as f64,
            height: msg.height as f64,
            origin: msg.origin.to_pose2d(),
        }
    }
}

/// Map changed notification; the header stamp doubles as image cache buster
#[derive(Debug, Clone, Deserialize)]
pub struct MapStatus {
    /// Header of the update
    #[serde(default)]
    pub header: Header,
    /// New map metadata
    pub info: MapMetaDataMsg,
}

/// Driver sensor report
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SensorStatus {
    /// Raw status word
    #[serde(rename = "sensorStatus")]
    pub sensor_status: u32,
}

/// Battery flags
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SimpleBatteryStatus {
    /// Charge below the warning level
    #[serde(default)]
    pub battery_low: bool,
    /// Charger current flowing
    #[serde(default)]
    pub is_charging: bool,
    /// Charging finished
    #[serde(default)]
    pub is_fully_charged: bool,
}

/// `std_msgs/Bool`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoolMsg {
    /// Value
    pub data: bool,
}

/// `actionlib_msgs/GoalID`
#[derive(Debug, Clone, Deserialize)]
pub struct GoalIdMsg {
    /// Goal id string
    pub id: String,
}

/// `actionlib_msgs/GoalStatus`
#[derive(Debug, Clone, Deserialize)]
pub struct GoalStatus {
    /// Goal the status is for
    pub goal_id: GoalIdMsg,
    /// Terminal status code
    #[serde(default)]
    pub status: u8,
    /// Free-form detail
    #[serde(default)]
    pub text: String,
}

/// Navigation result
#[derive(Debug, Clone, Deserialize)]
pub struct MoveBaseActionResult {
    /// Outcome of the goal
    pub status: GoalStatus,
}

/// `std_srvs/Trigger` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerResponse {
    /// Whether the trigger worked
    #[serde(default)]
    pub success: bool,
    /// Reason on failure
    #[serde(default)]
    pub message: String,
}

/// Parameter store save response
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SaveParamResponse {
    /// Whether the value reached disk
    #[serde(default)]
    pub success: bool,
}
