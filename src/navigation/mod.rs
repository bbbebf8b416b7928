//! Navigation for the console
//!
//! This module owns everything that makes the robot move:
//! - the navigation goal lifecycle (send, supersede, cancel, complete)
//! - hold-to-drive teleoperation buttons

mod drive;
mod goal;

pub use drive::*;
pub use goal::*;

use crate::core::status::BlockReason;
use crate::ros_interface::RosError;

/// Navigation error types
#[derive(Debug)]
pub enum NavigationError {
    /// Motion is blocked by the safety status
    Blocked(BlockReason),
    /// The charging station refused to release the robot
    UndockFailed(String),
    /// Bridge failure while sending commands
    Ros(RosError),
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NavigationError::Blocked(reason) => write!(f, "Cannot travel: {}", reason),
            NavigationError::UndockFailed(msg) => write!(f, "Failed to exit charging station: {}", msg),
            NavigationError::Ros(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for NavigationError {}

impl From<RosError> for NavigationError {
    fn from(err: RosError) -> Self {
        NavigationError::Ros(err)
    }
}
