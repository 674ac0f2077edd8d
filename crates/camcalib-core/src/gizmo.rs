//! Camera gizmo geometry.
//!
//! The gizmo is a pyramid: its apex sits at the camera position and its base
//! is the image rectangle at `depth` along the view direction, sized from the
//! field of view and aspect ratio. A small triangle above the base marks the
//! camera's up direction.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera3D, Projection};

/// Visual parameters for a camera gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoStyle {
    /// Distance from the apex to the base rectangle.
    pub depth: f32,
    /// Whether to add the up-marker triangle.
    pub up_marker: bool,
    /// Face color (RGBA).
    pub color: Vec4,
    /// Outline color (RGBA).
    pub outline_color: Vec4,
}

impl Default for GizmoStyle {
    fn default() -> Self {
        Self {
            depth: 0.5,
            up_marker: true,
            color: Vec4::new(0.9, 0.16, 0.22, 0.35),
            outline_color: Vec4::new(0.9, 0.16, 0.22, 1.0),
        }
    }
}

/// Geometry of a camera gizmo in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraGizmo {
    /// Pyramid apex (the camera position).
    pub apex: Vec3,
    /// Base corners: upper-left, upper-right, lower-right, lower-left.
    pub corners: [Vec3; 4],
    /// Up-marker triangle: left, right, tip.
    pub marker: [Vec3; 3],
    /// Filled faces: four pyramid sides, then the up marker when enabled.
    pub triangles: Vec<[Vec3; 3]>,
    /// Outline edges.
    pub edges: Vec<[Vec3; 2]>,
}

impl CameraGizmo {
    /// Builds the gizmo for `camera` as seen through a viewport of the given aspect ratio.
    #[must_use]
    pub fn build(camera: &Camera3D, aspect: f32, style: &GizmoStyle) -> Self {
        let (forward, right, up) = camera.basis();
        let depth = style.depth.max(f32::EPSILON);
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };

        let apex = camera.position;
        let center = apex + forward * depth;

        let half_height = match camera.projection {
            Projection::Perspective => depth * (camera.fovy.to_radians() * 0.5).tan(),
            Projection::Orthographic => camera.fovy * 0.5,
        };
        let half_width = half_height * aspect;

        let frame_up = up * half_height;
        let frame_right = right * half_width;

        let corners = [
            center + frame_up - frame_right,
            center + frame_up + frame_right,
            center - frame_up + frame_right,
            center - frame_up - frame_right,
        ];

        let marker = [
            center + frame_up * 1.2 - frame_right * 0.7,
            center + frame_up * 1.2 + frame_right * 0.7,
            center + frame_up * 2.0,
        ];

        let mut triangles: Vec<[Vec3; 3]> = (0..4)
            .map(|i| [apex, corners[i], corners[(i + 1) % 4]])
            .collect();

        let mut edges: Vec<[Vec3; 2]> = Vec::with_capacity(11);
        for corner in corners {
            edges.push([apex, corner]);
        }
        for i in 0..4 {
            edges.push([corners[i], corners[(i + 1) % 4]]);
        }

        if style.up_marker {
            triangles.push(marker);
            edges.push([marker[0], marker[1]]);
            edges.push([marker[1], marker[2]]);
            edges.push([marker[2], marker[0]]);
        }

        Self {
            apex,
            corners,
            marker,
            triangles,
            edges,
        }
    }

    /// Center of the base rectangle.
    #[must_use]
    pub fn base_center(&self) -> Vec3 {
        (self.corners[0] + self.corners[1] + self.corners[2] + self.corners[3]) * 0.25
    }

    /// Radius of a sphere around the base center that contains the whole gizmo.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        let center = self.base_center();
        std::iter::once(self.apex)
            .chain(self.corners)
            .chain(self.marker)
            .map(|p| p.distance(center))
            .fold(0.0, f32::max)
    }
}

/// The wire sphere drawn ahead of a camera along its view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookMarker {
    pub center: Vec3,
    pub radius: f32,
}

impl LookMarker {
    /// Places the marker `distance` beyond the camera target, along the view direction.
    #[must_use]
    pub fn new(camera: &Camera3D, distance: f32, radius: f32) -> Self {
        Self {
            center: camera.target + camera.forward() * distance,
            radius: radius.abs(),
        }
    }

    /// Line segments of the wire sphere.
    #[must_use]
    pub fn segments(&self, rings: u32, slices: u32) -> Vec<[Vec3; 2]> {
        wire_sphere_segments(self.center, self.radius, rings, slices)
    }
}

/// Line segments for a wire sphere made of latitude rings and longitude meridians.
///
/// `rings` counts the latitude bands (at least 2), `slices` the meridians (at least 3).
#[must_use]
pub fn wire_sphere_segments(center: Vec3, radius: f32, rings: u32, slices: u32) -> Vec<[Vec3; 2]> {
    let rings = rings.max(2);
    let slices = slices.max(3);

    let point = |ring: u32, slice: u32| -> Vec3 {
        let theta = std::f32::consts::PI * ring as f32 / rings as f32;
        let phi = std::f32::consts::TAU * slice as f32 / slices as f32;
        center
            + radius
                * Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
    };

    let mut segments = Vec::with_capacity((2 * rings * slices) as usize);

    // Meridians run pole to pole
    for slice in 0..slices {
        for ring in 0..rings {
            segments.push([point(ring, slice), point(ring + 1, slice)]);
        }
    }

    // Latitude rings, skipping the degenerate poles
    for ring in 1..rings {
        for slice in 0..slices {
            segments.push([point(ring, slice), point(ring, (slice + 1) % slices)]);
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_five_triangles_and_eleven_edges() {
        let gizmo = CameraGizmo::build(&Camera3D::default(), 1.0, &GizmoStyle::default());
        assert_eq!(gizmo.triangles.len(), 5);
        assert_eq!(gizmo.edges.len(), 11);
    }

    #[test]
    fn test_without_up_marker() {
        let style = GizmoStyle {
            up_marker: false,
            ..GizmoStyle::default()
        };
        let gizmo = CameraGizmo::build(&Camera3D::default(), 1.0, &style);
        assert_eq!(gizmo.triangles.len(), 4);
        assert_eq!(gizmo.edges.len(), 8);
    }

    #[test]
    fn test_base_size_follows_fov_and_aspect() {
        let camera = Camera3D::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0);
        let style = GizmoStyle {
            depth: 1.0,
            ..GizmoStyle::default()
        };
        let gizmo = CameraGizmo::build(&camera, 2.0, &style);

        // tan(45deg) = 1, so half height is 1 and half width is 2
        let [ul, ur, lr, _] = gizmo.corners;
        assert!((ul - Vec3::new(-2.0, 1.0, -1.0)).length() < 1e-5);
        assert!((ur - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
        assert!((lr - Vec3::new(2.0, -1.0, -1.0)).length() < 1e-5);
        assert!((gizmo.marker[2] - Vec3::new(0.0, 2.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_side_faces_share_apex() {
        let gizmo = CameraGizmo::build(&Camera3D::scene_default(), 1.5, &GizmoStyle::default());
        for tri in &gizmo.triangles[..4] {
            assert_eq!(tri[0], gizmo.apex);
        }
    }

    #[test]
    fn test_look_marker_beyond_target() {
        let camera = Camera3D::default();
        let marker = LookMarker::new(&camera, 30.0, 15.0);
        assert!((marker.center - Vec3::new(0.0, 0.0, -30.0)).length() < 1e-5);
        assert_eq!(marker.radius, 15.0);
    }

    #[test]
    fn test_wire_sphere_points_on_surface() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let segments = wire_sphere_segments(center, 2.0, 8, 12);
        assert_eq!(segments.len(), (8 * 12 + 7 * 12) as usize);
        for [a, b] in segments {
            assert!((a.distance(center) - 2.0).abs() < 1e-4);
            assert!((b.distance(center) - 2.0).abs() < 1e-4);
        }
    }

    proptest! {
        #[test]
        fn base_lies_in_plane_at_depth(
            px in -10.0f32..10.0, py in -10.0f32..10.0, pz in -10.0f32..10.0,
            tx in -10.0f32..10.0, ty in -10.0f32..10.0, tz in -10.0f32..10.0,
            fovy in 10.0f32..120.0,
            depth in 0.1f32..5.0,
        ) {
            let camera = Camera3D::new(Vec3::new(px, py, pz), Vec3::new(tx, ty, tz), Vec3::Y, fovy);
            prop_assume!(camera.distance() > 1e-2);
            let style = GizmoStyle { depth, ..GizmoStyle::default() };
            let gizmo = CameraGizmo::build(&camera, 1.5, &style);
            let forward = camera.forward();
            for corner in gizmo.corners {
                let along = (corner - camera.position).dot(forward);
                prop_assert!((along - depth).abs() < 1e-3 * depth.max(1.0));
            }
            prop_assert!(gizmo.edges.iter().flatten().all(|p| p.is_finite()));
        }
    }
}
