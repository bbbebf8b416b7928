// src/core/tracking.rs
// Keeps the latest robot pose and the world-frame poses of tracked people,
// composed from the TF streams delivered by the bridge.

use nalgebra::Matrix3;

use super::geometry::{compose, extract_yaw, pose_to_matrix, Pose2D, Quaternion};

/// Rigid transform as delivered by a TF stream (3D, only the planar part is used)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransform {
    /// Translation x (z is dropped)
    pub x: f64,
    /// Translation y
    pub y: f64,
    /// Rotation
    pub rotation: Quaternion,
}

impl FrameTransform {
    /// Planar pose of the transform
    pub fn to_pose(&self) -> Pose2D {
        Pose2D {
            x: self.x,
            y: self.y,
            theta: extract_yaw(&self.rotation),
        }
    }
}

/// Latest pose of the robot itself (`base_link` in the map frame)
#[derive(Debug, Default)]
pub struct RobotTracker {
    transform: Option<FrameTransform>,
}

impl RobotTracker {
    /// Tracker with no pose yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new `base_link` transform
    pub fn update(&mut self, transform: FrameTransform) {
        self.transform = Some(transform);
    }

    /// True once a transform has been received
    pub fn has_pose(&self) -> bool {
        self.transform.is_some()
    }

    /// Robot pose in the world frame, `None` until the first transform arrives
    pub fn world_location(&self) -> Option<Pose2D> {
        self.transform.map(|tf| tf.to_pose())
    }
}

/// Composes person detections (relative to the odometry frame) into world-frame
/// poses using the latest cached odometry transform.
#[derive(Debug)]
pub struct PeopleTracker {
    odom_matrix: Matrix3<f64>,
    people: Vec<Pose2D>,
}

impl Default for PeopleTracker {
    fn default() -> Self {
        PeopleTracker {
            odom_matrix: Matrix3::identity(),
            people: Vec::new(),
        }
    }
}

impl PeopleTracker {
    /// Tracker with an identity odometry transform and nobody seen
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a new `odom` transform. Already composed people are left as is.
    pub fn update_odom(&mut self, transform: FrameTransform) {
        self.odom_matrix = pose_to_matrix(&transform.to_pose());
    }

    /// Replace the snapshot with a new batch of relative detections.
    ///
    /// Returns `true` when the redraw trigger should fire, i.e. always, since
    /// the snapshot is replaced on every batch.
    pub fn update_tracks(&mut self, detections: &[Pose2D]) -> bool {
        self.people = detections
            .iter()
            .map(|relative| compose(&self.odom_matrix, relative))
            .collect();
        log::trace!("Tracking {} people", self.people.len());
        true
    }

    /// World-frame poses of the latest batch
    pub fn people(&self) -> &[Pose2D] {
        &self.people
    }
}
