//! Robot Console - operator console core for a mobile robot
//!
//! This library holds everything behind the operator's map view: coordinate
//! conversions, tracked poses, saved destinations, the navigation goal
//! lifecycle and safety status, talking to the robot over rosbridge.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// YAML configuration with stock defaults
pub mod config;
/// Event routing between the bridge, the core state and the view
pub mod console;
pub mod core;
pub mod navigation;
pub mod ros_interface;
pub mod view;

// Re-export commonly used items for easier access
pub use crate::config::ConsoleConfig;
pub use crate::console::{Console, OperatorIntent};
pub use crate::core::{Destination, LocationRegistry, MapView, Pose2D, SystemStatus};
pub use crate::navigation::{DrivingControls, GoalLifecycle, NavigationError};
pub use crate::ros_interface::{Bridge, BridgeEvent, RosError, RosbridgeClient};
pub use crate::view::{Canvas, ConsoleView};

use crate::core::locations::ValidationError;

/// Console error types
#[derive(Debug)]
pub enum ConsoleError {
    /// Bridge error
    Ros(RosError),
    /// Destination edit rejected
    Validation(ValidationError),
    /// Navigation request rejected or failed
    Navigation(NavigationError),
    /// Robot pose needed but no transform received yet
    RobotPoseUnknown,
    /// Go requested without a selected destination
    NoDestinationSelected,
    /// Destination name not in the saved set
    UnknownDestination(String),
    /// Configuration error
    ConfigError(String),
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConsoleError::Ros(err) => write!(f, "ROS error: {}", err),
            ConsoleError::Validation(err) => write!(f, "Invalid location: {}", err),
            ConsoleError::Navigation(err) => write!(f, "Navigation error: {}", err),
            ConsoleError::RobotPoseUnknown => write!(f, "Robot position not known yet"),
            ConsoleError::NoDestinationSelected => write!(f, "No destination selected"),
            ConsoleError::UnknownDestination(name) => write!(f, "Unknown destination: {}", name),
            ConsoleError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<RosError> for ConsoleError {
    fn from(err: RosError) -> Self {
        ConsoleError::Ros(err)
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::Validation(err)
    }
}

impl From<NavigationError> for ConsoleError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Ros(err) => ConsoleError::Ros(err),
            other => ConsoleError::Navigation(other),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Ros(RosError::from(err))
    }
}

impl From<serde_yaml::Error> for ConsoleError {
    fn from(err: serde_yaml::Error) -> Self {
        ConsoleError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::ConfigError(err.to_string())
    }
}
