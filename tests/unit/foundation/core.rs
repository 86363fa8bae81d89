use super::*;

#[test]
fn fps_validation_and_conversions() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_floor(1.5), 90);
    assert!((fps.frames_to_secs(30) - 0.5).abs() < 1e-12);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert_eq!(r.len_frames(), 3);
    assert!(!r.is_empty());
}

#[test]
fn vec3_arithmetic() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(4.0, 6.0, 3.0);
    assert_eq!(b - a, Vec3::new(3.0, 4.0, 0.0));
    assert_eq!(a + b, Vec3::new(5.0, 8.0, 6.0));
    assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
    assert!((a.distance(b) - 5.0).abs() < 1e-12);
}

#[test]
fn rotate_y_quarter_turn_maps_x_to_minus_z() {
    let p = Vec3::new(1.0, 5.0, 0.0).rotate_y(std::f64::consts::FRAC_PI_2);
    assert!(p.x.abs() < 1e-12);
    assert!((p.y - 5.0).abs() < 1e-12);
    assert!((p.z + 1.0).abs() < 1e-12);
}

#[test]
fn degenerate_viewport_has_unit_aspect() {
    assert_eq!(Viewport::new(0, 0).aspect(), 1.0);
    assert!((Viewport::new(800, 600).aspect() - 4.0 / 3.0).abs() < 1e-12);
}
