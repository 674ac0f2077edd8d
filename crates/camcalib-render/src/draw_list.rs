//! Immediate-mode draw list.
//!
//! A [`DrawList`] is filled every frame with colored lines and triangles in
//! world space, then uploaded and drawn by a [`crate::Viewport`]. Nothing is
//! retained between frames.

use camcalib_core::gizmo::{wire_sphere_segments, CameraGizmo, GizmoStyle};
use camcalib_core::{
    GridOptions, LookMarker, TargetOptions, MAX_GRID_HALF_LINES, MAX_TARGET_SQUARES,
};
use glam::{Vec3, Vec4};

/// Red, green and blue for the X, Y and Z axes.
pub const AXIS_COLORS: [Vec4; 3] = [
    Vec4::new(0.9, 0.2, 0.2, 1.0),
    Vec4::new(0.2, 0.8, 0.2, 1.0),
    Vec4::new(0.2, 0.4, 0.95, 1.0),
];

/// Vertex layout shared by the line and triangle pipelines.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    /// Creates a vertex.
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    /// Vertex buffer layout for pipelines.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Lines and triangles queued for one viewport.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    lines: Vec<Vertex>,
    triangles: Vec<Vertex>,
}

impl DrawList {
    /// Creates an empty draw list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes everything, keeping allocations.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.triangles.clear();
    }

    /// Queues one line segment.
    pub fn line(&mut self, a: Vec3, b: Vec3, color: Vec4) {
        self.lines.push(Vertex::new(a, color));
        self.lines.push(Vertex::new(b, color));
    }

    /// Queues a batch of line segments sharing one color.
    pub fn lines(&mut self, segments: &[[Vec3; 2]], color: Vec4) {
        self.lines.reserve(segments.len() * 2);
        for [a, b] in segments {
            self.line(*a, *b, color);
        }
    }

    /// Queues a filled triangle. Triangles are drawn double-sided.
    pub fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Vec4) {
        self.triangles.push(Vertex::new(a, color));
        self.triangles.push(Vertex::new(b, color));
        self.triangles.push(Vertex::new(c, color));
    }

    /// Queues the three edges of a triangle.
    pub fn triangle_outline(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Vec4) {
        self.line(a, b, color);
        self.line(b, c, color);
        self.line(c, a, color);
    }

    /// Queues a wire sphere.
    pub fn wire_sphere(&mut self, center: Vec3, radius: f32, rings: u32, slices: u32, color: Vec4) {
        self.lines(&wire_sphere_segments(center, radius, rings, slices), color);
    }

    /// Queues the ground grid in the XZ plane, at most
    /// [`MAX_GRID_HALF_LINES`] lines either side of the origin.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn grid(&mut self, grid: &GridOptions) {
        if !(grid.spacing > 0.0 && grid.extent > 0.0) {
            return;
        }
        let extent = grid.extent;
        let half_lines = (extent / grid.spacing)
            .floor()
            .min(MAX_GRID_HALF_LINES as f32) as i32;
        for i in -half_lines..=half_lines {
            let offset = i as f32 * grid.spacing;
            self.line(
                Vec3::new(offset, 0.0, -extent),
                Vec3::new(offset, 0.0, extent),
                grid.color,
            );
            self.line(
                Vec3::new(-extent, 0.0, offset),
                Vec3::new(extent, 0.0, offset),
                grid.color,
            );
        }
    }

    /// Queues the X, Y and Z axes from `origin`.
    pub fn axes(&mut self, origin: Vec3, length: f32) {
        for (axis, color) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().zip(AXIS_COLORS) {
            self.line(origin, origin + axis * length, color);
        }
    }

    /// Queues a checkerboard calibration target in the XY plane, centered on the origin.
    #[allow(clippy::cast_precision_loss)]
    pub fn checkerboard(&mut self, target: &TargetOptions) {
        if target.rows == 0 || target.cols == 0 || target.square_size <= 0.0 {
            return;
        }
        if u64::from(target.rows) * u64::from(target.cols) > u64::from(MAX_TARGET_SQUARES) {
            log::warn!("calibration target of {}x{} squares is too large", target.rows, target.cols);
            return;
        }
        let size = target.square_size;
        let origin = Vec3::new(
            -(target.cols as f32) * size * 0.5,
            -(target.rows as f32) * size * 0.5,
            0.0,
        );
        for row in 0..target.rows {
            for col in 0..target.cols {
                let color = if (row + col) % 2 == 0 {
                    target.dark_color
                } else {
                    target.light_color
                };
                let p0 = origin + Vec3::new(col as f32 * size, row as f32 * size, 0.0);
                let p1 = p0 + Vec3::new(size, 0.0, 0.0);
                let p2 = p0 + Vec3::new(size, size, 0.0);
                let p3 = p0 + Vec3::new(0.0, size, 0.0);
                self.triangle(p0, p1, p2, color);
                self.triangle(p0, p2, p3, color);
            }
        }
    }

    /// Queues a camera gizmo: translucent faces plus outline.
    pub fn camera_gizmo(&mut self, gizmo: &CameraGizmo, style: &GizmoStyle) {
        for [a, b, c] in &gizmo.triangles {
            self.triangle(*a, *b, *c, style.color);
        }
        self.lines(&gizmo.edges, style.outline_color);
    }

    /// Queues a look marker as a wire sphere.
    pub fn look_marker(&mut self, marker: &LookMarker, color: Vec4) {
        self.lines(&marker.segments(16, 16), color);
    }

    /// Line vertices, two per segment.
    pub fn line_vertices(&self) -> &[Vertex] {
        &self.lines
    }

    /// Triangle vertices, three per triangle.
    pub fn triangle_vertices(&self) -> &[Vertex] {
        &self.triangles
    }

    /// Number of queued line segments.
    pub fn line_count(&self) -> usize {
        self.lines.len() / 2
    }

    /// Number of queued triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.triangles.is_empty()
    }
}
