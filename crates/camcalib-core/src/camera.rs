//! Camera state and view management.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Smallest field of view accepted by [`Camera3D::set_fovy`], in degrees.
pub const MIN_FOVY: f32 = 1.0;
/// Largest field of view accepted by [`Camera3D::set_fovy`], in degrees.
pub const MAX_FOVY: f32 = 179.0;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective projection, `fovy` is the vertical field of view in degrees.
    #[default]
    Perspective,
    /// Orthographic projection, `fovy` is the view height in world units.
    Orthographic,
}

impl Projection {
    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Projection::Perspective => "Perspective",
            Projection::Orthographic => "Orthographic",
        }
    }
}

/// A 3D camera: where it is, what it looks at, and how it projects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera3D {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector (need not be orthogonal to the view direction).
    pub up: Vec3,
    /// Vertical field of view in degrees (perspective) or view height (orthographic).
    pub fovy: f32,
    /// Projection mode.
    pub projection: Projection,
}

impl Camera3D {
    /// Creates a perspective camera.
    #[must_use]
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fovy: f32) -> Self {
        Self {
            position,
            target,
            up,
            fovy,
            projection: Projection::Perspective,
        }
    }

    /// The keyboard-driven calibration camera: one unit in front of the origin.
    #[must_use]
    pub fn calibration_default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, Vec3::Y, 60.0)
    }

    /// The mouse-navigated scene camera, looking at the origin from above and to the side.
    #[must_use]
    pub fn scene_default() -> Self {
        Self::new(Vec3::new(6.0, 4.0, 8.0), Vec3::ZERO, Vec3::Y, 45.0)
    }

    /// Distance from position to target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Returns the normalized view direction.
    ///
    /// Falls back to -Z when position and target coincide.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.basis().1
    }

    /// Returns the up direction re-orthogonalized against the view direction.
    #[must_use]
    pub fn true_up(&self) -> Vec3 {
        self.basis().2
    }

    /// Returns the orthonormal camera frame as (forward, right, up).
    ///
    /// When the view direction is parallel to `up` an arbitrary but stable
    /// right vector is chosen so the frame never contains NaN.
    #[must_use]
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let right = forward
            .cross(self.up)
            .try_normalize()
            .unwrap_or_else(|| forward.any_orthonormal_pair().0);
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let (forward, _, up) = self.basis();
        Mat4::look_to_rh(self.position, forward, up)
    }

    /// Returns the projection matrix for the given viewport aspect ratio.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fovy.to_radians(), aspect, near, far)
            }
            Projection::Orthographic => {
                let half_height = self.fovy * 0.5;
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    near,
                    far,
                )
            }
        }
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        self.projection_matrix(aspect, near, far) * self.view_matrix()
    }

    /// Sets the field of view (perspective) in degrees, clamped to a usable range.
    pub fn set_fovy(&mut self, fovy: f32) {
        self.fovy = match self.projection {
            Projection::Perspective => fovy.clamp(MIN_FOVY, MAX_FOVY),
            Projection::Orthographic => fovy.max(0.01),
        };
    }

    /// Sets the projection mode.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.set_fovy(self.fovy);
    }

    /// Returns true if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite() && self.up.is_finite() && self.fovy.is_finite()
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::calibration_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_calibration_defaults() {
        let camera = Camera3D::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.up, Vec3::Y);
        assert_eq!(camera.fovy, 60.0);
        assert_eq!(camera.projection, Projection::Perspective);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera3D::scene_default();
        let (f, r, u) = camera.basis();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
    }

    #[test]
    fn test_basis_looking_down_negative_z() {
        let camera = Camera3D::default();
        let (f, r, u) = camera.basis();
        assert!(approx(f, Vec3::NEG_Z));
        assert!(approx(r, Vec3::X));
        assert!(approx(u, Vec3::Y));
    }

    #[test]
    fn test_degenerate_camera_has_finite_basis() {
        let mut camera = Camera3D::default();
        camera.target = camera.position;
        let (f, r, u) = camera.basis();
        assert!(f.is_finite() && r.is_finite() && u.is_finite());

        // Looking straight along the up vector
        let camera = Camera3D::new(Vec3::ZERO, Vec3::Y, Vec3::Y, 60.0);
        let (f, r, u) = camera.basis();
        assert!(approx(f, Vec3::Y));
        assert!(r.is_finite() && u.is_finite());
        assert!(f.dot(r).abs() < 1e-5);
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn test_view_matrix_maps_target_onto_negative_z() {
        let camera = Camera3D::scene_default();
        let eye_space = camera.view_matrix().transform_point3(camera.target);
        assert!(eye_space.x.abs() < 1e-4);
        assert!(eye_space.y.abs() < 1e-4);
        assert!((eye_space.z + camera.distance()).abs() < 1e-4);
    }

    #[test]
    fn test_projection_modes() {
        let mut camera = Camera3D::default();
        let proj = camera.projection_matrix(1.0, 0.01, 100.0);
        // Perspective matrix has non-zero w division
        assert!(proj.z_axis.w != 0.0);

        camera.set_projection(Projection::Orthographic);
        let proj = camera.projection_matrix(1.0, 0.01, 100.0);
        assert!((proj.w_axis.w - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_invalid_aspect_falls_back() {
        let camera = Camera3D::default();
        assert!(camera.projection_matrix(0.0, 0.01, 100.0).is_finite());
        assert!(camera.projection_matrix(f32::NAN, 0.01, 100.0).is_finite());
    }

    #[test]
    fn test_set_fovy_clamping() {
        let mut camera = Camera3D::default();
        camera.set_fovy(0.0);
        assert_eq!(camera.fovy, MIN_FOVY);
        camera.set_fovy(360.0);
        assert_eq!(camera.fovy, MAX_FOVY);
    }

    #[test]
    fn test_serde_fills_missing_fields() {
        let camera: Camera3D = serde_json::from_str(r#"{ "fovy": 30.0 }"#).unwrap();
        assert_eq!(camera.fovy, 30.0);
        assert_eq!(camera.position, Camera3D::default().position);
    }
}
