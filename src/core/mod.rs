//! Pure console state
//!
//! Geometry and map conversions, tracked poses, safety status and the
//! destination registry. Nothing here talks to the bridge.

/// Points, poses and frame composition
pub mod geometry;
/// Saved destinations and their editor
pub mod locations;
/// Map metadata and coordinate conversions
pub mod map;
/// Sensor status, safety blocking and battery text
pub mod status;
/// Robot and people poses in the fixed frame
pub mod tracking;

// Re-export key types for a unified API
pub use geometry::{Point2D, Pose2D, Quaternion};
pub use locations::{Destination, LocationRegistry, ValidationError};
pub use map::{MapFrame, MapMetadata, MapView, Size};
pub use status::{BlockReason, BlockStatus, StatusFlags, SystemStatus};
pub use tracking::{FrameTransform, PeopleTracker, RobotTracker};
