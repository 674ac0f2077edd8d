//! Configuration options for camcalib.

use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::camera::Camera3D;
use crate::error::{CamCalibError, Result};
use crate::fly::FlySettings;
use crate::gizmo::GizmoStyle;
use crate::navigation::NavigationSettings;

/// Most grid lines on either side of the origin, per direction.
pub const MAX_GRID_HALF_LINES: u32 = 5_000;
/// Most squares on the calibration target.
pub const MAX_TARGET_SQUARES: u32 = 10_000;

/// Ground grid drawn in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub enabled: bool,
    /// Half-width of the grid in world units.
    pub extent: f32,
    /// Distance between grid lines.
    pub spacing: f32,
    pub color: Vec4,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            extent: 10.0,
            spacing: 1.0,
            color: Vec4::new(0.5, 0.5, 0.5, 0.6),
        }
    }
}

/// Checkerboard calibration target placed in the XY plane at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetOptions {
    pub enabled: bool,
    pub rows: u32,
    pub cols: u32,
    /// Edge length of one square in world units.
    pub square_size: f32,
    pub dark_color: Vec4,
    pub light_color: Vec4,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            rows: 6,
            cols: 8,
            square_size: 0.1,
            dark_color: Vec4::new(0.05, 0.05, 0.05, 1.0),
            light_color: Vec4::new(0.95, 0.95, 0.95, 1.0),
        }
    }
}

/// Global configuration options for camcalib.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Title of the main window.
    pub window_title: String,
    /// Initial window size in logical pixels.
    pub window_size: [u32; 2],

    /// Size of the offscreen viewport targets.
    pub render_target_size: [u32; 2],
    /// Whether the targets follow the size of their panels.
    pub follow_panel_size: bool,

    /// Window background color behind the panels.
    pub background_color: Vec3,
    /// Clear color of the viewport targets (RGBA, transparent by default).
    pub clear_color: Vec4,

    /// Camera gizmo appearance.
    pub gizmo: GizmoStyle,
    /// Multiplier applied to the gizmo depth and the look marker.
    pub gizmo_scale: f32,

    /// Whether to draw the wire sphere ahead of the calibration camera.
    pub show_look_marker: bool,
    pub look_marker_distance: f32,
    pub look_marker_radius: f32,
    pub look_marker_color: Vec4,

    pub grid: GridOptions,
    /// Whether to draw the world axes at the origin.
    pub show_axes: bool,
    /// Length of the world axes.
    pub axes_length: f32,
    pub calibration_target: TargetOptions,

    pub navigation: NavigationSettings,
    pub fly: FlySettings,

    /// Initial calibration camera.
    pub calibration_camera: Camera3D,
    /// Initial scene camera.
    pub scene_camera: Camera3D,

    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_title: "Maia - CamCalib".to_string(),
            window_size: [800, 600],
            render_target_size: [256, 256],
            follow_panel_size: true,
            background_color: Vec3::new(0.96, 0.96, 0.96),
            clear_color: Vec4::ZERO,
            gizmo: GizmoStyle::default(),
            gizmo_scale: 1.0,
            show_look_marker: true,
            look_marker_distance: 30.0,
            look_marker_radius: 15.0,
            look_marker_color: Vec4::new(0.9, 0.16, 0.22, 1.0),
            grid: GridOptions::default(),
            show_axes: true,
            axes_length: 1.0,
            calibration_target: TargetOptions::default(),
            navigation: NavigationSettings::default(),
            fly: FlySettings::default(),
            calibration_camera: Camera3D::calibration_default(),
            scene_camera: Camera3D::scene_default(),
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&json)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Writes options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        log::info!("saved options to {}", path.display());
        Ok(())
    }

    /// Checks value ranges that would otherwise produce degenerate rendering.
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> CamCalibError {
            CamCalibError::InvalidOption {
                name,
                reason: reason.into(),
            }
        }

        if self.render_target_size.contains(&0) {
            return Err(invalid("render_target_size", "dimensions must be non-zero"));
        }
        if self.window_size.contains(&0) {
            return Err(invalid("window_size", "dimensions must be non-zero"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(invalid(
                "near",
                format!("need 0 < near < far, got near={} far={}", self.near, self.far),
            ));
        }
        if !(self.gizmo_scale > 0.0 && self.gizmo_scale.is_finite()) {
            return Err(invalid("gizmo_scale", "must be positive"));
        }
        if !(self.grid.spacing > 0.0) {
            return Err(invalid("grid.spacing", "must be positive"));
        }
        if !(self.grid.extent.is_finite()
            && f64::from(self.grid.extent / self.grid.spacing) <= f64::from(MAX_GRID_HALF_LINES))
        {
            return Err(invalid(
                "grid.extent",
                format!("extent / spacing must be at most {MAX_GRID_HALF_LINES}"),
            ));
        }
        let squares = u64::from(self.calibration_target.rows) * u64::from(self.calibration_target.cols);
        if squares > u64::from(MAX_TARGET_SQUARES) {
            return Err(invalid(
                "calibration_target",
                format!("rows * cols must be at most {MAX_TARGET_SQUARES}, got {squares}"),
            ));
        }
        if !(self.navigation.min_distance > 0.0
            && self.navigation.max_distance > self.navigation.min_distance)
        {
            return Err(invalid(
                "navigation",
                "need 0 < min_distance < max_distance",
            ));
        }
        if !(self.navigation.zoom_step > 0.0 && self.navigation.zoom_step < 1.0) {
            return Err(invalid("navigation.zoom_step", "must be in (0, 1)"));
        }
        if !self.calibration_camera.is_finite() {
            return Err(invalid("calibration_camera", "contains non-finite values"));
        }
        if !self.scene_camera.is_finite() {
            return Err(invalid("scene_camera", "contains non-finite values"));
        }
        Ok(())
    }

    /// Gizmo style with the scale applied.
    #[must_use]
    pub fn scaled_gizmo(&self) -> GizmoStyle {
        GizmoStyle {
            depth: self.gizmo.depth * self.gizmo_scale,
            ..self.gizmo
        }
    }
}
