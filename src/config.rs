// src/config.rs
// Console configuration. Every field has a default matching the robot's stock
// deployment, so a YAML file only needs to list what differs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ros_interface::RosapiServices;
use crate::ConsoleError;

/// Main configuration structure for the console
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Middleware names and rates
    pub ros: RosConfig,
    /// Goal lifecycle settings
    pub navigation: NavigationConfig,
    /// Hold-to-drive settings
    pub driving: DrivingConfig,
    /// Operator interface settings
    pub ui: UiConfig,
}

/// Middleware specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosConfig {
    /// Prefix for action goal ids issued by this console
    pub client_id: String,
    /// Frame every pose is expressed in
    pub fixed_frame: String,
    /// Frame of the robot body
    pub robot_frame: String,
    /// Moving frame people detections are relative to
    pub odom_frame: String,
    /// Namespace of the tf2 web republisher action
    pub tf_republisher: String,
    /// Rotation (rad) that triggers a new transform
    pub tf_angular_thres: f64,
    /// Translation (m) that triggers a new transform
    pub tf_trans_thres: f64,
    /// Hz
    pub tf_rate: f64,
    /// Throttle for battery and sensor status (ms)
    pub status_throttle_ms: u32,
    /// Throttle for tracked people (ms)
    pub people_throttle_ms: u32,
    /// Topic names
    pub topics: TopicConfig,
    /// Service names
    pub services: ServiceConfig,
    /// Persisted parameter names
    pub params: ParamConfig,
    /// rosapi service names
    pub rosapi: RosapiServices,
}

/// Topic names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Velocity commands
    pub cmd_vel: String,
    /// Driver mode and sound codes
    pub cmd_mode: String,
    /// Soft estop state
    pub soft_estop_get: String,
    /// Soft estop requests
    pub soft_estop_set: String,
    /// Sensor status word
    pub sensor_status: String,
    /// Battery flags
    pub battery_status: String,
    /// Map changed notifications
    pub map_updated: String,
    /// People tracker output
    pub tracked_persons: String,
}

/// Service names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// `std_srvs/Trigger` leaving the charging station
    pub undock: String,
    /// Durable parameter persistence
    pub save_param: String,
}

/// Parameter names used to persist destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamConfig {
    /// Destination id counter
    pub next_id: String,
    /// Saved destinations as a JSON list
    pub locations: String,
}

/// Navigation goal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Action server namespace (goal/cancel/result topics live under it)
    pub action_server: String,
    /// Frame of goal poses
    pub goal_frame: String,
    /// Audible cues on send and finish
    pub sound_enabled: bool,
}

/// One entry of the speed selector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedPreset {
    /// m/s
    pub linear: f64,
    /// rad/s
    pub angular: f64,
}

/// Hold-to-drive configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivingConfig {
    /// Velocity command period while a button is held
    pub repeat_period_ms: u64,
    /// Speed selector entries
    pub speed_presets: Vec<SpeedPreset>,
    /// Index into `speed_presets` selected at start
    pub default_speed: usize,
}

/// Operator interface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Lifetime of transient notices
    pub notice_timeout_ms: u64,
    /// Max world distance (m) between a click and the destination it selects
    pub pick_radius: f64,
    /// Base URL of the map image
    pub map_image_url: String,
    /// Whether the destinations overlay starts enabled
    pub show_locations: bool,
}

impl Default for RosConfig {
    fn default() -> Self {
        RosConfig {
            client_id: "robot_console".to_string(),
            fixed_frame: "map".to_string(),
            robot_frame: "base_link".to_string(),
            odom_frame: "odom".to_string(),
            tf_republisher: "/tf2_web_republisher".to_string(),
            tf_angular_thres: 0.01,
            tf_trans_thres: 0.01,
            tf_rate: 10.0,
            status_throttle_ms: 10_000,
            people_throttle_ms: 100,
            topics: TopicConfig::default(),
            services: ServiceConfig::default(),
            params: ParamConfig::default(),
            rosapi: RosapiServices::default(),
        }
    }
}

impl Default for TopicConfig {
    fn default() -> Self {
        TopicConfig {
            cmd_vel: "/cmd_vel".to_string(),
            cmd_mode: "/hrp/cmd_mode".to_string(),
            soft_estop_get: "/soft_estop/get".to_string(),
            soft_estop_set: "/soft_estop/set".to_string(),
            sensor_status: "/hrp/sensor_status".to_string(),
            battery_status: "/battery/status".to_string(),
            map_updated: "/web/map_updated".to_string(),
            tracked_persons: "/spencer/perception/tracked_persons_confirmed_by_HOG_or_upper_body_or_moving"
                .to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            undock: "/exit_charging_station".to_string(),
            save_param: "/config_manager/save_param".to_string(),
        }
    }
}

impl Default for ParamConfig {
    fn default() -> Self {
        ParamConfig {
            next_id: "/web/next_id".to_string(),
            locations: "/web/locations".to_string(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            action_server: "/move_base".to_string(),
            goal_frame: "map".to_string(),
            sound_enabled: true,
        }
    }
}

impl Default for DrivingConfig {
    fn default() -> Self {
        DrivingConfig {
            repeat_period_ms: 100,
            speed_presets: vec![
                SpeedPreset { linear: 0.2, angular: 0.4 },
                SpeedPreset { linear: 0.4, angular: 0.8 },
                SpeedPreset { linear: 0.6, angular: 1.2 },
            ],
            default_speed: 0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            notice_timeout_ms: 5_000,
            pick_radius: 2.0,
            map_image_url: "maps/map.png".to_string(),
            show_locations: true,
        }
    }
}

impl ConsoleConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConsoleError> {
        let config: ConsoleConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConsoleError> {
        let config_file = std::fs::File::open(path.as_ref())?;
        let config: ConsoleConfig = serde_yaml::from_reader(config_file)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConsoleError> {
        if self.driving.repeat_period_ms == 0 {
            return Err(ConsoleError::ConfigError("driving.repeat_period_ms must be positive".to_string()));
        }
        if self.driving.speed_presets.is_empty() {
            return Err(ConsoleError::ConfigError("driving.speed_presets is empty".to_string()));
        }
        if self.driving.default_speed >= self.driving.speed_presets.len() {
            return Err(ConsoleError::ConfigError(format!(
                "driving.default_speed {} out of range",
                self.driving.default_speed
            )));
        }
        Ok(())
    }
}
