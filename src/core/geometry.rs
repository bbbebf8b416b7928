// src/core/geometry.rs
// Planar geometry shared by every console layer: points, poses, quaternions and
// the homogeneous transforms used to compose reference frames.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Sine-of-pitch threshold beyond which yaw extraction switches to the
/// gimbal-lock branch.
const GIMBAL_LOCK_THRESHOLD: f64 = 0.99999;

/// 2D point (metres in world frame, cells in map frame, pixels in image frame)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// 2D pose; theta is radians counterclockwise from the x axis and is never
/// normalised
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Orientation (radians)
    pub theta: f64,
}

/// Rotation quaternion as delivered by the robot middleware
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// X of the vector part
    pub x: f64,
    /// Y of the vector part
    pub y: f64,
    /// Z of the vector part
    pub z: f64,
    /// Scalar part
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

impl Point2D {
    /// Point at (x, y)
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    /// Attach an orientation to this point
    pub fn with_theta(self, theta: f64) -> Pose2D {
        Pose2D { x: self.x, y: self.y, theta }
    }
}

impl Pose2D {
    /// Pose at (x, y) facing theta
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose2D { x, y, theta }
    }

    /// Position part of the pose
    pub fn position(&self) -> Point2D {
        Point2D { x: self.x, y: self.y }
    }

    /// Homogeneous transform for this pose
    pub fn to_matrix(&self) -> Matrix3<f64> {
        pose_to_matrix(self)
    }
}

impl From<Pose2D> for Point2D {
    fn from(pose: Pose2D) -> Self {
        pose.position()
    }
}

/// Extract yaw (rotation about z) from a quaternion.
///
/// Mirrors tf2's `getYaw`: the cross term is normalised by the squared norm so
/// non-unit quaternions are accepted, and near the poles yaw falls back to a
/// two-argument arctangent of the x/y components.
pub fn extract_yaw(q: &Quaternion) -> f64 {
    let sqx = q.x * q.x;
    let sqy = q.y * q.y;
    let sqz = q.z * q.z;
    let sqw = q.w * q.w;

    let sarg = -2.0 * (q.x * q.z - q.w * q.y) / (sqx + sqy + sqz + sqw);

    if sarg <= -GIMBAL_LOCK_THRESHOLD {
        -2.0 * q.y.atan2(q.x)
    } else if sarg >= GIMBAL_LOCK_THRESHOLD {
        2.0 * q.y.atan2(q.x)
    } else {
        (2.0 * (q.x * q.y + q.w * q.z)).atan2(sqw + sqx - sqy - sqz)
    }
}

/// Planar rotation quaternion for a yaw angle
pub fn yaw_to_quaternion(theta: f64) -> Quaternion {
    Quaternion {
        x: 0.0,
        y: 0.0,
        z: (theta / 2.0).sin(),
        w: (theta / 2.0).cos(),
    }
}

/// 3x3 homogeneous transform for a planar pose
pub fn pose_to_matrix(pose: &Pose2D) -> Matrix3<f64> {
    let (sin, cos) = pose.theta.sin_cos();
    Matrix3::new(
        cos, -sin, pose.x, //
        sin, cos, pose.y, //
        0.0, 0.0, 1.0,
    )
}

/// Planar pose encoded in a homogeneous transform
pub fn matrix_to_pose(matrix: &Matrix3<f64>) -> Pose2D {
    Pose2D {
        x: matrix[(0, 2)],
        y: matrix[(1, 2)],
        theta: matrix[(1, 0)].atan2(matrix[(0, 0)]),
    }
}

/// Express `relative` (a pose in `frame`) in the parent of `frame`
pub fn compose(frame: &Matrix3<f64>, relative: &Pose2D) -> Pose2D {
    matrix_to_pose(&(frame * pose_to_matrix(relative)))
}

/// Euclidean distance between two points
pub fn distance_l2(a: Point2D, b: Point2D) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn identity_quaternion_has_zero_yaw() {
        assert_eq!(extract_yaw(&Quaternion::default()), 0.0);
    }

    #[test]
    fn unnormalised_quaternion_is_accepted() {
        let q = yaw_to_quaternion(FRAC_PI_2);
        let scaled = Quaternion { x: q.x * 3.0, y: q.y * 3.0, z: q.z * 3.0, w: q.w * 3.0 };
        assert!((extract_yaw(&scaled) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn gimbal_lock_uses_xy_branch() {
        // 90 degree pitch: sarg == 1
        let half = (PI / 4.0).sin();
        let q = Quaternion { x: 0.0, y: half, z: 0.0, w: half };
        assert!((extract_yaw(&q) - 2.0 * half.atan2(0.0)).abs() < 1e-12);
    }

    #[test]
    fn matrix_round_trip_keeps_pose() {
        let pose = Pose2D::new(1.5, -2.0, 0.75);
        let back = matrix_to_pose(&pose_to_matrix(&pose));
        assert!((back.x - pose.x).abs() < 1e-12);
        assert!((back.y - pose.y).abs() < 1e-12);
        assert!((back.theta - pose.theta).abs() < 1e-12);
    }

    #[test]
    fn distance_is_not_rounded() {
        assert_eq!(distance_l2(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0)), 5.0);
        assert!((distance_l2(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)) - 2f64.sqrt()).abs() < 1e-15);
    }
}
