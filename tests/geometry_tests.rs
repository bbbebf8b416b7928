// tests/geometry_tests.rs
// Frame composition and map/image conversions.

#[cfg(test)]
mod tests {
    use robot_console::core::geometry::{
        compose, extract_yaw, pose_to_matrix, yaw_to_quaternion, Point2D, Pose2D, Quaternion,
    };
    use robot_console::core::map::{MapMetadata, MapView, Size};
    use robot_console::core::tracking::{FrameTransform, PeopleTracker};
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    // Yaw survives a trip through a quaternion for angles inside (-pi, pi]
    #[rstest]
    #[case(0.0)]
    #[case(0.3)]
    #[case(-1.2)]
    #[case(FRAC_PI_2)]
    #[case(3.0)]
    fn yaw_round_trip(#[case] theta: f64) {
        let q = yaw_to_quaternion(theta);
        assert!(close(extract_yaw(&q), theta), "theta {} came back as {}", theta, extract_yaw(&q));
    }

    #[test]
    fn half_turn_quaternion() {
        let q = Quaternion { x: 0.0, y: 0.0, z: 1.0, w: 0.0 };
        assert!(close(extract_yaw(&q).abs(), PI));
    }

    #[test]
    fn compose_rotates_then_translates() {
        let frame = pose_to_matrix(&Pose2D::new(1.0, 2.0, FRAC_PI_2));
        let world = compose(&frame, &Pose2D::new(1.0, 0.0, 0.0));
        assert!(close(world.x, 1.0));
        assert!(close(world.y, 3.0));
        assert!(close(world.theta, FRAC_PI_2));
    }

    #[test]
    fn people_follow_odometry() {
        let mut people = PeopleTracker::new();
        assert!(people.update_tracks(&[Pose2D::new(1.0, 0.0, 0.0)]));
        assert!(close(people.people()[0].x, 1.0));

        people.update_odom(FrameTransform {
            x: 5.0,
            y: 0.0,
            rotation: yaw_to_quaternion(FRAC_PI_2),
        });
        // Cached poses are not recomputed; the next batch uses the new odometry
        assert!(close(people.people()[0].x, 1.0));
        people.update_tracks(&[Pose2D::new(1.0, 0.0, 0.0)]);
        assert!(close(people.people()[0].x, 5.0));
        assert!(close(people.people()[0].y, 1.0));
    }

    fn ready_map() -> MapView {
        let mut map = MapView::new();
        map.set_metadata(MapMetadata {
            resolution: 0.05,
            width: 400.0,
            height: 200.0,
            origin: Pose2D::new(-10.0, -5.0, 0.0),
        });
        map.set_image_size(Size::new(400.0, 200.0));
        map.resize_canvas(Size::new(800.0, 800.0));
        map
    }

    #[test]
    fn scale_fits_the_narrow_side() {
        assert!(close(ready_map().scale_factor(), 2.0));
    }

    #[rstest]
    #[case(Point2D::new(0.0, 0.0))]
    #[case(Point2D::new(-10.0, -5.0))]
    #[case(Point2D::new(3.25, 1.5))]
    fn world_image_inverse(#[case] world: Point2D) {
        let frame = ready_map().frame().unwrap();
        let back = frame.image2world(frame.world2image(world));
        assert!(close(back.x, world.x));
        assert!(close(back.y, world.y));
    }

    #[test]
    fn image_y_is_flipped() {
        let frame = ready_map().frame().unwrap();
        let origin = frame.world2image(Point2D::new(-10.0, -5.0));
        assert!(close(origin.x, 0.0));
        assert!(close(origin.y, 400.0));
    }

    #[test]
    fn zero_image_size_gives_zero_scale() {
        let mut map = MapView::new();
        map.resize_canvas(Size::new(100.0, 100.0));
        map.set_image_size(Size::new(0.0, 0.0));
        assert_eq!(map.scale_factor(), 0.0);
        assert!(map.frame().is_none());
    }
}
