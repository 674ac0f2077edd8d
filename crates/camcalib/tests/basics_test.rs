//! Basic integration tests for camcalib through its public API.
//!
//! Tests that open a window are marked #[ignore]
//! and should be run manually with: cargo test -- --ignored

use std::collections::HashSet;

use camcalib::*;

#[test]
fn test_options_json() {
    let options = Options::from_json_str(r#"{ "gizmo_scale": 0.25, "show_axes": false }"#)
        .expect("valid options");
    assert!((options.gizmo_scale - 0.25).abs() < f32::EPSILON);
    assert!(!options.show_axes);
    assert_eq!(options.render_target_size, [256, 256]);

    let json = options.to_json_string().expect("serialize");
    let parsed = Options::from_json_str(&json).expect("reparse");
    assert_eq!(parsed.gizmo_scale, options.gizmo_scale);

    assert!(Options::from_json_str(r#"{ "render_target_size": [0, 10] }"#).is_err());
    assert!(Options::from_json_str("not json").is_err());
}

#[test]
fn test_scene_state_views() {
    let mut state = SceneState::default();
    let mut calibration = DrawList::new();
    let mut scene = DrawList::new();
    state.build_calibration_view(&mut calibration);
    state.build_scene_view(&mut scene, 1.0);

    // The scene view draws everything the calibration view does plus the gizmo
    assert!(scene.triangle_count() > calibration.triangle_count());
    assert!(scene.line_count() > calibration.line_count());

    state.options.gizmo.up_marker = false;
    let mut without_marker = DrawList::new();
    state.build_scene_view(&mut without_marker, 1.0);
    assert_eq!(without_marker.triangle_count() + 1, scene.triangle_count());
}

#[test]
fn test_navigation_through_input_frame() {
    let settings = NavigationSettings::default();
    let mut camera = Camera3D::scene_default();
    let distance = camera.distance();

    let mut input = InputFrame::new();
    input.hovered = Some(ViewportId::Scene);
    input.cursor_moved(Vec2::new(100.0, 100.0));
    input.set_button(MouseButton::Middle, true);
    input.cursor_moved(Vec2::new(140.0, 90.0));

    assert!(input.targets(ViewportId::Scene));
    assert!(!input.targets(ViewportId::Calibration));
    assert!(navigation::apply(&mut camera, &input, &settings));
    assert!((camera.distance() - distance).abs() < 1e-3);
    assert_eq!(camera.target, Vec3::ZERO);

    // Nothing held: the camera stays put
    input.end_frame();
    input.set_button(MouseButton::Middle, false);
    let before = camera;
    assert!(!navigation::apply(&mut camera, &input, &settings));
    assert_eq!(camera, before);
}

#[test]
fn test_fly_moves_calibration_camera() {
    let settings = FlySettings::default();
    let mut camera = Camera3D::calibration_default();
    let keys: HashSet<FlyKey> = [FlyKey::Forward].into_iter().collect();

    assert!(fly(&mut camera, &keys, false, 0.5, &settings));
    assert!(camera.position.z < 1.0);
    // Translation keeps the view direction
    assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
}

#[test]
#[ignore = "opens a window"]
fn test_show_window() {
    show().expect("viewer failed");
}
