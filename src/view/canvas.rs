// src/view/canvas.rs
// Overlay drawing and hit testing in image coordinates.

use crate::core::geometry::{distance_l2, Point2D, Pose2D};
use crate::core::locations::Destination;
use crate::core::map::MapFrame;

/// Marker radius in pixels
pub const POSE_RADIUS: f64 = 5.0;
/// Heading pointer length in pixels
pub const POINTER_LENGTH: f64 = 10.0;

/// What a marker represents; colours are up to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// The robot
    Robot,
    /// A tracked person
    Person,
    /// A saved destination
    Location,
    /// The current goal
    Target,
}

/// Minimal 2D drawing surface
pub trait Canvas {
    /// Erase everything
    fn clear(&mut self);
    /// Outlined circle
    fn draw_circle(&mut self, center: Point2D, radius: f64, style: Style);
    /// Straight segment
    fn draw_line(&mut self, from: Point2D, to: Point2D, style: Style);
}

/// Circle with a heading pointer at an image-space pose.
///
/// Image y grows downwards, so the pointer subtracts the sine term.
pub fn draw_pose(canvas: &mut dyn Canvas, pose: &Pose2D, style: Style, pointer_length: f64) {
    let center = pose.position();
    canvas.draw_circle(center, POSE_RADIUS, style);
    let tip = Point2D {
        x: pose.x + pointer_length * pose.theta.cos(),
        y: pose.y - pointer_length * pose.theta.sin(),
    };
    canvas.draw_line(center, tip, style);
}

/// Draw world-frame poses onto the canvas
pub fn draw_world_poses<'a, I>(canvas: &mut dyn Canvas, frame: &MapFrame, poses: I, style: Style)
where
    I: IntoIterator<Item = &'a Pose2D>,
{
    for pose in poses {
        draw_pose(canvas, &frame.world_pose2image(pose), style, POINTER_LENGTH);
    }
}

/// Saved destination closest to an image coordinate, if within `radius` metres
pub fn find_closest_location<'a>(
    frame: &MapFrame,
    locations: &[&'a Destination],
    image_coord: Point2D,
    radius: f64,
) -> Option<&'a Destination> {
    let world = frame.image2world(image_coord);
    let mut best: Option<(&'a Destination, f64)> = None;
    for location in locations.iter().copied() {
        let dist = distance_l2(world, location.position());
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((location, dist));
        }
    }
    best.filter(|(_, dist)| *dist < radius).map(|(location, _)| location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::MapMetadata;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Point2D, Point2D)>,
        circles: usize,
    }

    impl Canvas for Recorder {
        fn clear(&mut self) {}
        fn draw_circle(&mut self, _center: Point2D, _radius: f64, _style: Style) {
            self.circles += 1;
        }
        fn draw_line(&mut self, from: Point2D, to: Point2D, _style: Style) {
            self.lines.push((from, to));
        }
    }

    #[test]
    fn pointer_goes_up_for_positive_heading() {
        let mut canvas = Recorder::default();
        draw_pose(&mut canvas, &Pose2D::new(50.0, 50.0, std::f64::consts::FRAC_PI_2), Style::Robot, 10.0);
        assert_eq!(canvas.circles, 1);
        let (_, tip) = canvas.lines[0];
        assert!((tip.x - 50.0).abs() < 1e-9);
        assert!((tip.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn far_clicks_select_nothing() {
        let frame = MapFrame::new(
            MapMetadata {
                resolution: 1.0,
                width: 100.0,
                height: 100.0,
                origin: Pose2D::default(),
            },
            1.0,
        );
        let kitchen = Destination { id: 0, name: "Kitchen".into(), x: 10.0, y: 10.0, theta: 0.0 };
        let list = [&kitchen];
        // world (10, 10) is image (10, 90)
        assert_eq!(find_closest_location(&frame, &list, Point2D::new(11.0, 90.0), 2.0), Some(&kitchen));
        assert_eq!(find_closest_location(&frame, &list, Point2D::new(20.0, 90.0), 2.0), None);
    }
}
