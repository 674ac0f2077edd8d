//! Keyboard movement of the calibration camera.

use std::collections::HashSet;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::Camera3D;
use crate::navigation::tilt;

/// Narrowest field of view reachable with the zoom keys, in degrees.
pub const FLY_MIN_FOVY: f32 = 10.0;
/// Widest field of view reachable with the zoom keys, in degrees.
pub const FLY_MAX_FOVY: f32 = 120.0;
/// Field of view change per second of held zoom key, in degrees.
const FOVY_RATE: f32 = 30.0;

/// Logical movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlyKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    ZoomIn,
    ZoomOut,
}

/// Speeds for keyboard movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlySettings {
    /// Translation speed in world units per second.
    pub move_speed: f32,
    /// Rotation speed in radians per second.
    pub turn_speed: f32,
    /// Translation multiplier while Shift is held.
    pub boost: f32,
}

impl Default for FlySettings {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            turn_speed: 1.0,
            boost: 4.0,
        }
    }
}

fn axis(keys: &HashSet<FlyKey>, positive: FlyKey, negative: FlyKey) -> f32 {
    f32::from(u8::from(keys.contains(&positive))) - f32::from(u8::from(keys.contains(&negative)))
}

/// Moves the camera for `dt` seconds of held keys. Returns true if it changed.
///
/// Translation moves position and target together along the view direction,
/// the camera's right axis and the world up axis. Yaw and pitch turn the
/// target about the position; pitch stops short of the up axis.
pub fn fly(
    camera: &mut Camera3D,
    keys: &HashSet<FlyKey>,
    boost: bool,
    dt: f32,
    settings: &FlySettings,
) -> bool {
    if keys.is_empty() || !dt.is_finite() || dt <= 0.0 {
        return false;
    }

    let mut changed = false;
    let world_up = camera.up.try_normalize().unwrap_or(Vec3::Y);
    let (forward, right, _) = camera.basis();

    // Translation
    let speed = settings.move_speed * if boost { settings.boost } else { 1.0 } * dt;
    let motion = forward * axis(keys, FlyKey::Forward, FlyKey::Back)
        + right * axis(keys, FlyKey::Right, FlyKey::Left)
        + world_up * axis(keys, FlyKey::Up, FlyKey::Down);
    if motion != Vec3::ZERO {
        let offset = motion * speed;
        camera.position += offset;
        camera.target += offset;
        changed = true;
    }

    // Rotation of the look direction about the camera position
    let turn = settings.turn_speed * dt;
    let yaw = axis(keys, FlyKey::YawLeft, FlyKey::YawRight) * turn;
    let pitch = axis(keys, FlyKey::PitchUp, FlyKey::PitchDown) * turn;
    if yaw != 0.0 || pitch != 0.0 {
        let mut look = camera.target - camera.position;
        if look.length_squared() <= f32::EPSILON {
            look = forward;
        }
        look = Quat::from_axis_angle(world_up, yaw) * look;
        if pitch != 0.0 {
            // Pitching up shrinks the angle to the up axis
            look = tilt(look, world_up, -pitch, world_up.cross(right));
        }
        camera.target = camera.position + look;
        changed = true;
    }

    // Field of view
    let zoom = axis(keys, FlyKey::ZoomOut, FlyKey::ZoomIn);
    if zoom != 0.0 {
        let fovy = (camera.fovy + zoom * FOVY_RATE * dt).clamp(FLY_MIN_FOVY, FLY_MAX_FOVY);
        if fovy != camera.fovy {
            camera.fovy = fovy;
            changed = true;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[FlyKey]) -> HashSet<FlyKey> {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_forward_moves_position_and_target() {
        let mut camera = Camera3D::default();
        let settings = FlySettings::default();
        assert!(fly(&mut camera, &held(&[FlyKey::Forward]), false, 0.5, &settings));
        assert!((camera.position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
        assert!((camera.target - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
    }

    #[test]
    fn test_boost_multiplies_speed() {
        let mut camera = Camera3D::default();
        let settings = FlySettings::default();
        fly(&mut camera, &held(&[FlyKey::Right]), true, 0.25, &settings);
        assert!((camera.position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = Camera3D::default();
        let before = camera;
        let keys = held(&[FlyKey::Up, FlyKey::Down]);
        assert!(!fly(&mut camera, &keys, false, 1.0, &FlySettings::default()));
        assert_eq!(camera, before);
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let mut camera = Camera3D::default();
        let keys = held(&[FlyKey::Forward, FlyKey::YawLeft]);
        assert!(!fly(&mut camera, &keys, false, 0.0, &FlySettings::default()));
        assert!(!fly(&mut camera, &keys, false, -1.0, &FlySettings::default()));
        assert_eq!(camera, Camera3D::default());
    }

    #[test]
    fn test_yaw_keeps_position_and_distance() {
        let mut camera = Camera3D::default();
        let settings = FlySettings::default();
        fly(
            &mut camera,
            &held(&[FlyKey::YawLeft]),
            false,
            std::f32::consts::FRAC_PI_2,
            &settings,
        );
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 1.0));
        assert!((camera.distance() - 1.0).abs() < 1e-5);
        // Turning left from -Z faces -X
        assert!((camera.forward() - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_pitch_stops_at_pole() {
        let mut camera = Camera3D::default();
        let settings = FlySettings::default();
        for _ in 0..50 {
            fly(&mut camera, &held(&[FlyKey::PitchUp]), false, 0.1, &settings);
        }
        let angle = camera.forward().angle_between(Vec3::Y);
        assert!(angle > crate::navigation::POLE_GUARD * 0.5);
        assert!(camera.forward().y > 0.9);
    }

    #[test]
    fn test_long_frame_pitch_does_not_flip() {
        let settings = FlySettings::default();
        for (key, dt) in [(FlyKey::PitchUp, 2.5), (FlyKey::PitchDown, 2.5), (FlyKey::PitchUp, 60.0)] {
            let mut camera = Camera3D::default();
            assert!(fly(&mut camera, &held(&[key]), false, dt, &settings));
            let forward = camera.forward();
            // Still facing -Z, tipped at most to just short of the pole
            assert!(forward.z < 0.0, "{key:?} dt={dt} flipped: {forward:?}");
            assert!(forward.x.abs() < 1e-4);
            assert!(forward.y.abs() > 0.99);
            assert!((camera.distance() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pitch_off_the_pole() {
        let mut camera = Camera3D::new(Vec3::ZERO, Vec3::Y, Vec3::Y, 60.0);
        let settings = FlySettings::default();
        assert!(fly(&mut camera, &held(&[FlyKey::PitchDown]), false, 0.5, &settings));
        let forward = camera.forward();
        assert!(forward.is_finite());
        assert!((forward.angle_between(Vec3::Y) - 0.5).abs() < 1e-3);
        assert_eq!(camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_zoom_keys_clamp_fovy() {
        let mut camera = Camera3D::default();
        let settings = FlySettings::default();
        fly(&mut camera, &held(&[FlyKey::ZoomIn]), false, 1.0, &settings);
        assert!((camera.fovy - 30.0).abs() < 1e-4);
        fly(&mut camera, &held(&[FlyKey::ZoomIn]), false, 10.0, &settings);
        assert_eq!(camera.fovy, FLY_MIN_FOVY);
        fly(&mut camera, &held(&[FlyKey::ZoomOut]), false, 10.0, &settings);
        assert_eq!(camera.fovy, FLY_MAX_FOVY);
        // Already at the limit
        assert!(!fly(&mut camera, &held(&[FlyKey::ZoomOut]), false, 1.0, &settings));
    }
}
