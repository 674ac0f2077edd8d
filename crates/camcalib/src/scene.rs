//! What each viewport draws, independent of the GPU.

use camcalib_core::{Camera3D, CameraGizmo, LookMarker, Options, Vec3};
use camcalib_render::DrawList;

/// Everything the two viewports show.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    /// Keyboard-driven camera whose gizmo is drawn in the scene view.
    pub calibration: Camera3D,
    /// Mouse-navigated camera observing the scene.
    pub scene: Camera3D,
    pub options: Options,
}

impl SceneState {
    /// Creates the state with both cameras at their configured starting poses.
    pub fn new(options: Options) -> Self {
        Self {
            calibration: options.calibration_camera,
            scene: options.scene_camera,
            options,
        }
    }

    /// Puts the calibration camera back at its starting pose.
    pub fn reset_calibration(&mut self) {
        self.calibration = self.options.calibration_camera;
    }

    /// Puts the scene camera back at its starting pose.
    pub fn reset_scene(&mut self) {
        self.scene = self.options.scene_camera;
    }

    /// The calibration camera gizmo, sized for the calibration viewport's aspect ratio.
    pub fn calibration_gizmo(&self, aspect: f32) -> CameraGizmo {
        CameraGizmo::build(&self.calibration, aspect, &self.options.scaled_gizmo())
    }

    /// The wire sphere ahead of the calibration camera.
    pub fn look_marker(&self) -> LookMarker {
        let scale = self.options.gizmo_scale;
        LookMarker::new(
            &self.calibration,
            self.options.look_marker_distance * scale,
            self.options.look_marker_radius * scale,
        )
    }

    /// Re-targets the scene camera so the calibration gizmo fills the view.
    pub fn frame_gizmo(&mut self, aspect: f32) {
        let gizmo = self.calibration_gizmo(aspect);
        let center = gizmo.base_center();
        let radius = gizmo.bounding_radius();
        camcalib_core::navigation::frame_view(
            &mut self.scene,
            center,
            radius,
            &self.options.navigation,
        );
    }

    /// Fills `list` with what the calibration camera sees.
    pub fn build_calibration_view(&self, list: &mut DrawList) {
        list.clear();
        self.build_environment(list);
    }

    /// Fills `list` with the scene view: the environment plus the calibration camera gizmo.
    pub fn build_scene_view(&self, list: &mut DrawList, calibration_aspect: f32) {
        list.clear();
        self.build_environment(list);
        let style = self.options.scaled_gizmo();
        list.camera_gizmo(&self.calibration_gizmo(calibration_aspect), &style);
        // Line from the camera to its target
        list.line(
            self.calibration.position,
            self.calibration.target,
            style.outline_color.truncate().extend(0.5),
        );
    }

    fn build_environment(&self, list: &mut DrawList) {
        let options = &self.options;
        if options.calibration_target.enabled {
            list.checkerboard(&options.calibration_target);
        }
        if options.grid.enabled {
            list.grid(&options.grid);
        }
        if options.show_axes {
            list.axes(Vec3::ZERO, options.axes_length);
        }
        if options.show_look_marker {
            list.look_marker(&self.look_marker(), options.look_marker_color);
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camcalib_core::GridOptions;
    use proptest::prelude::*;

    fn bare_options() -> Options {
        let mut options = Options::default();
        options.grid = GridOptions {
            enabled: false,
            ..GridOptions::default()
        };
        options.show_axes = false;
        options.show_look_marker = false;
        options.calibration_target.enabled = false;
        options
    }

    #[test]
    fn test_calibration_view_has_no_gizmo() {
        let state = SceneState::new(bare_options());
        let mut list = DrawList::new();
        state.build_calibration_view(&mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_scene_view_adds_gizmo() {
        let state = SceneState::new(bare_options());
        let mut list = DrawList::new();
        state.build_scene_view(&mut list, 1.0);
        assert_eq!(list.triangle_count(), 5);
        // Eleven outline edges plus the line to the target
        assert_eq!(list.line_count(), 12);
    }

    #[test]
    fn test_toggles_control_environment() {
        let mut options = bare_options();
        options.show_axes = true;
        let state = SceneState::new(options);
        let mut list = DrawList::new();
        state.build_calibration_view(&mut list);
        assert_eq!(list.line_count(), 3);
        assert_eq!(list.triangle_count(), 0);

        // Rebuilding clears the previous frame
        state.build_calibration_view(&mut list);
        assert_eq!(list.line_count(), 3);
    }

    #[test]
    fn test_look_marker_scales_with_gizmo() {
        let mut options = Options::default();
        options.gizmo_scale = 0.1;
        let state = SceneState::new(options);
        let marker = state.look_marker();
        assert!((marker.radius - 1.5).abs() < 1e-5);
        assert!((marker.center - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-4);
    }

    #[test]
    fn test_reset_restores_configured_pose() {
        let mut state = SceneState::default();
        state.calibration.position = Vec3::new(5.0, 5.0, 5.0);
        state.scene.target = Vec3::ONE;
        state.reset_calibration();
        state.reset_scene();
        assert_eq!(state.calibration, Camera3D::calibration_default());
        assert_eq!(state.scene, Camera3D::scene_default());
    }

    #[test]
    fn test_frame_gizmo_targets_gizmo() {
        let mut state = SceneState::default();
        state.calibration.position = Vec3::new(3.0, 1.0, 2.0);
        state.calibration.target = Vec3::new(3.0, 1.0, 0.0);
        state.frame_gizmo(1.0);

        let gizmo = state.calibration_gizmo(1.0);
        assert!((state.scene.target - gizmo.base_center()).length() < 1e-4);
        let half_fov = state.scene.fovy.to_radians() * 0.5;
        assert!(state.scene.distance() * half_fov.sin() >= gizmo.bounding_radius());
    }

    proptest! {
        #[test]
        fn framed_gizmo_fits_scene_view(
            px in -20.0f32..20.0, py in -20.0f32..20.0, pz in -20.0f32..20.0,
            tx in -20.0f32..20.0, ty in -20.0f32..20.0, tz in -20.0f32..20.0,
            aspect in 0.5f32..2.5,
        ) {
            let mut state = SceneState::default();
            state.calibration.position = Vec3::new(px, py, pz);
            state.calibration.target = Vec3::new(tx, ty, tz);
            prop_assume!(state.calibration.distance() > 1e-2);

            state.frame_gizmo(aspect);
            let gizmo = state.calibration_gizmo(aspect);
            prop_assert!((state.scene.target - gizmo.base_center()).length() < 1e-3);
            let half_fov = state.scene.fovy.to_radians() * 0.5;
            prop_assert!(state.scene.distance() * half_fov.sin() >= gizmo.bounding_radius() * 0.999);
        }
    }
}
