//! Per-viewport GPU resources.

use glam::{Mat4, Vec4};

use crate::draw_list::{DrawList, Vertex};
use crate::engine::RenderEngine;
use crate::pipelines::ViewportUniforms;
use crate::render_target::RenderTarget;

/// Smallest vertex buffer allocation, in vertices.
const MIN_VERTEX_CAPACITY: usize = 1024;

/// A vertex buffer that grows by doubling and never shrinks.
struct VertexBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl VertexBuffer {
    fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            buffer: Self::allocate(device, label, MIN_VERTEX_CAPACITY),
            capacity: MIN_VERTEX_CAPACITY,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) {
        if vertices.len() > self.capacity {
            let capacity = grown_capacity(self.capacity, vertices.len());
            log::debug!("growing {} to {capacity} vertices", self.label);
            self.buffer = Self::allocate(device, self.label, capacity);
            self.capacity = capacity;
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(vertices));
        }
    }
}

/// Doubles `capacity` until it holds `needed` vertices.
fn grown_capacity(capacity: usize, needed: usize) -> usize {
    let mut capacity = capacity.max(MIN_VERTEX_CAPACITY);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}

/// One offscreen view of the scene: a render target plus the buffers to draw into it.
pub struct Viewport {
    /// Where this viewport renders.
    pub target: RenderTarget,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    lines: VertexBuffer,
    triangles: VertexBuffer,
}

impl Viewport {
    /// Creates a viewport with a target of the given size.
    pub fn new(engine: &RenderEngine, width: u32, height: u32, label: &str) -> Self {
        let device = &engine.device;
        let target = RenderTarget::new(device, width, height, label);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("viewport uniforms"),
            size: std::mem::size_of::<ViewportUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("viewport bind group"),
            layout: &engine.pipelines.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            target,
            uniform_buffer,
            bind_group,
            lines: VertexBuffer::new(device, "viewport line vertices"),
            triangles: VertexBuffer::new(device, "viewport triangle vertices"),
        }
    }

    /// Resizes the target. Returns true if its textures were recreated.
    pub fn resize(&mut self, engine: &RenderEngine, width: u32, height: u32) -> bool {
        self.target.resize(&engine.device, width, height)
    }

    /// Uploads `draw_list` and records one render pass into the target:
    /// clear, triangles, then lines on top.
    #[allow(clippy::cast_possible_truncation)]
    pub fn render(
        &mut self,
        engine: &RenderEngine,
        encoder: &mut wgpu::CommandEncoder,
        draw_list: &DrawList,
        view_proj: Mat4,
        clear: Vec4,
    ) {
        engine.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[ViewportUniforms::new(view_proj)]),
        );
        self.triangles
            .upload(&engine.device, &engine.queue, draw_list.triangle_vertices());
        self.lines
            .upload(&engine.device, &engine.queue, draw_list.line_vertices());

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.target.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(clear.x),
                        g: f64::from(clear.y),
                        b: f64::from(clear.z),
                        a: f64::from(clear.w),
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.target.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.bind_group, &[]);

        let triangle_count = draw_list.triangle_vertices().len() as u32;
        if triangle_count > 0 {
            render_pass.set_pipeline(&engine.pipelines.triangle_pipeline);
            render_pass.set_vertex_buffer(0, self.triangles.buffer.slice(..));
            render_pass.draw(0..triangle_count, 0..1);
        }

        let line_count = draw_list.line_vertices().len() as u32;
        if line_count > 0 {
            render_pass.set_pipeline(&engine.pipelines.line_pipeline);
            render_pass.set_vertex_buffer(0, self.lines.buffer.slice(..));
            render_pass.draw(0..line_count, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grown_capacity_doubles() {
        assert_eq!(grown_capacity(1024, 10), 1024);
        assert_eq!(grown_capacity(1024, 1025), 2048);
        assert_eq!(grown_capacity(1024, 5000), 8192);
        assert_eq!(grown_capacity(0, 1), MIN_VERTEX_CAPACITY);
    }

    proptest! {
        #[test]
        fn grown_capacity_fits_within_double(
            capacity in 0usize..100_000,
            needed in 0usize..1_000_000,
        ) {
            let grown = grown_capacity(capacity, needed);
            prop_assert!(grown >= needed);
            prop_assert!(grown >= capacity.max(MIN_VERTEX_CAPACITY));
            // Never more than double what was needed, once past the start size
            prop_assert!(grown <= (2 * needed).max(capacity.max(MIN_VERTEX_CAPACITY)));
        }
    }
}
