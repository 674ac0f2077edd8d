//! Mouse navigation for the scene camera.
//!
//! Blender-style bindings: middle drag orbits around the target, Shift +
//! middle drag pans, Ctrl + middle drag dollies and the wheel zooms. Right
//! drag pans and Alt + left drag orbits for mice and trackpads without a
//! usable middle button.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera3D, Projection};
use crate::input::{InputFrame, Modifiers, MouseButtons};

/// Closest angle (radians) the view direction may get to the up axis while orbiting.
pub const POLE_GUARD: f32 = 0.01;

/// Tilts `direction` toward or away from `up`, keeping its length and heading.
///
/// The angle from `up` grows by `delta` and is clamped to stay at least
/// [`POLE_GUARD`] from either pole, so any delta lands on the same side.
/// `fallback_heading` is used when `direction` is parallel to `up`; it must
/// be a unit vector orthogonal to `up`.
pub(crate) fn tilt(direction: Vec3, up: Vec3, delta: f32, fallback_heading: Vec3) -> Vec3 {
    let length = direction.length();
    let heading = (direction - up * direction.dot(up))
        .try_normalize()
        .unwrap_or(fallback_heading);
    let polar = (direction.angle_between(up) + delta).clamp(POLE_GUARD, PI - POLE_GUARD);
    (heading * polar.sin() + up * polar.cos()) * length
}

/// Sensitivities and limits for mouse navigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Radians of orbit per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Fraction of the target distance panned per pixel of drag.
    pub pan_sensitivity: f32,
    /// Fraction of the target distance removed per wheel notch.
    pub zoom_step: f32,
    /// Fraction of the target distance added per pixel of vertical dolly drag.
    pub dolly_sensitivity: f32,
    /// Closest the camera may get to its target.
    pub min_distance: f32,
    /// Farthest the camera may get from its target.
    pub max_distance: f32,
    /// Inverts vertical orbit.
    pub invert_y: bool,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.01,
            pan_sensitivity: 0.002,
            zoom_step: 0.1,
            dolly_sensitivity: 0.01,
            min_distance: 0.05,
            max_distance: 10_000.0,
            invert_y: false,
        }
    }
}

/// What a mouse drag does this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavAction {
    Orbit,
    Pan,
    Dolly,
    #[default]
    None,
}

impl NavAction {
    /// Picks the action for the held buttons and modifiers.
    #[must_use]
    pub fn from_buttons(buttons: MouseButtons, modifiers: Modifiers) -> Self {
        if buttons.middle {
            if modifiers.shift {
                NavAction::Pan
            } else if modifiers.ctrl {
                NavAction::Dolly
            } else {
                NavAction::Orbit
            }
        } else if buttons.right {
            NavAction::Pan
        } else if buttons.left && modifiers.alt {
            NavAction::Orbit
        } else {
            NavAction::None
        }
    }

    /// Picks the action for an input frame.
    #[must_use]
    pub fn from_input(input: &InputFrame) -> Self {
        Self::from_buttons(input.buttons, input.modifiers)
    }
}

/// Orbits the camera around its target by a mouse delta in pixels.
///
/// Yaw turns around the camera's up axis, pitch around its right axis.
/// Pitch is clamped [`POLE_GUARD`] short of the up axis, so the camera never
/// flips over the pole, and a camera sitting on the pole can still be pitched
/// off it. Distance to the target is preserved.
pub fn orbit(camera: &mut Camera3D, dx: f32, dy: f32, settings: &NavigationSettings) -> bool {
    if dx == 0.0 && dy == 0.0 {
        return false;
    }
    repair_degenerate(camera, settings);

    let world_up = camera.up.try_normalize().unwrap_or(Vec3::Y);
    let mut offset = camera.position - camera.target;

    let yaw = Quat::from_axis_angle(world_up, -dx * settings.orbit_sensitivity);
    offset = yaw * offset;

    // Dragging down (positive dy) raises the camera toward the up axis
    let pitch_angle = if settings.invert_y { dy } else { -dy } * settings.orbit_sensitivity;
    if pitch_angle != 0.0 {
        let heading = camera.right().cross(world_up);
        offset = tilt(offset, world_up, pitch_angle, heading);
    }

    camera.position = camera.target + offset;
    true
}

/// Pans the camera and its target together in the view plane.
///
/// The pan speed scales with the target distance so a pixel of drag moves
/// the scene by roughly the same screen amount at any zoom level.
pub fn pan(camera: &mut Camera3D, dx: f32, dy: f32, settings: &NavigationSettings) -> bool {
    if dx == 0.0 && dy == 0.0 {
        return false;
    }
    let (_, right, up) = camera.basis();
    let scale = match camera.projection {
        Projection::Perspective => camera.distance().max(settings.min_distance),
        Projection::Orthographic => camera.fovy,
    } * settings.pan_sensitivity;

    let offset = (-right * dx + up * dy) * scale;
    camera.position += offset;
    camera.target += offset;
    true
}

/// Zooms by wheel notches; positive notches move toward the target.
///
/// Each notch scales the target distance by `1 - zoom_step`. Orthographic
/// cameras scale their view height instead.
pub fn zoom(camera: &mut Camera3D, notches: f32, settings: &NavigationSettings) -> bool {
    if notches == 0.0 {
        return false;
    }
    let factor = (1.0 - settings.zoom_step.clamp(0.0, 0.95)).powf(notches);
    scale_distance(camera, factor, settings)
}

/// Dollies by a vertical drag in pixels; dragging down moves away from the target.
pub fn dolly(camera: &mut Camera3D, dy: f32, settings: &NavigationSettings) -> bool {
    if dy == 0.0 {
        return false;
    }
    let factor = (1.0 + settings.dolly_sensitivity).powf(dy);
    scale_distance(camera, factor, settings)
}

/// Multiplies the distance (or orthographic height) by `factor`, clamped to
/// the configured range. A factor that overflowed saturates at the far limit
/// and one that underflowed at the near limit.
fn scale_distance(camera: &mut Camera3D, factor: f32, settings: &NavigationSettings) -> bool {
    if factor.is_nan() {
        return false;
    }
    let factor = factor.max(0.0);
    let scale = |value: f32| {
        let scaled = value * factor;
        let scaled = if scaled.is_nan() { value } else { scaled };
        scaled.min(f32::MAX).clamp(settings.min_distance, settings.max_distance)
    };
    match camera.projection {
        Projection::Perspective => {
            let forward = camera.forward();
            camera.position = camera.target - forward * scale(camera.distance());
        }
        Projection::Orthographic => {
            camera.fovy = scale(camera.fovy);
        }
    }
    true
}

/// Applies one frame of mouse input to the camera. Returns true if it moved.
pub fn apply(camera: &mut Camera3D, input: &InputFrame, settings: &NavigationSettings) -> bool {
    let delta = input.mouse_delta;
    let moved = match NavAction::from_input(input) {
        NavAction::Orbit => orbit(camera, delta.x, delta.y, settings),
        NavAction::Pan => pan(camera, delta.x, delta.y, settings),
        NavAction::Dolly => dolly(camera, delta.y, settings),
        NavAction::None => false,
    };
    let zoomed = zoom(camera, input.wheel, settings);
    moved || zoomed
}

/// Re-targets the camera onto a sphere, keeping its view direction, so the
/// whole sphere fits in view.
pub fn frame_view(camera: &mut Camera3D, center: Vec3, radius: f32, settings: &NavigationSettings) {
    let forward = camera.forward();
    let radius = radius.max(settings.min_distance);
    camera.target = center;
    match camera.projection {
        Projection::Perspective => {
            let half_fov = (camera.fovy.to_radians() * 0.5).max(0.01);
            let distance = (radius / half_fov.sin() * 1.1)
                .clamp(settings.min_distance, settings.max_distance);
            camera.position = center - forward * distance;
        }
        Projection::Orthographic => {
            camera.fovy = radius * 2.2;
            camera.position = center - forward * (radius * 3.0);
        }
    }
    log::debug!(
        "framed view on ({:.2}, {:.2}, {:.2}) r={radius:.2}",
        center.x,
        center.y,
        center.z
    );
}

/// Pushes the camera back from its target when the two coincide.
fn repair_degenerate(camera: &mut Camera3D, settings: &NavigationSettings) {
    if camera.distance() < settings.min_distance * 0.5 {
        let forward = camera.forward();
        camera.position = camera.target - forward * settings.min_distance;
    }
}
