//! Line and triangle pipelines for draw lists.

use std::num::NonZeroU64;

use crate::draw_list::Vertex;
use crate::render_target::{COLOR_FORMAT, DEPTH_FORMAT};

/// Per-viewport uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewportUniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl Default for ViewportUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

impl ViewportUniforms {
    /// Creates uniforms from a view-projection matrix.
    pub fn new(view_proj: glam::Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// The two pipelines every viewport draws with, sharing one bind group layout.
pub struct LineTrianglePipelines {
    /// Layout of the viewport uniform bind group (group 0).
    pub bind_group_layout: wgpu::BindGroupLayout,
    /// Line list pipeline.
    pub line_pipeline: wgpu::RenderPipeline,
    /// Alpha-blended, double-sided triangle list pipeline.
    pub triangle_pipeline: wgpu::RenderPipeline,
}

impl LineTrianglePipelines {
    /// Compiles the shader and creates both pipelines.
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("immediate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("viewport bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<ViewportUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("immediate pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "line pipeline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::CompareFunction::LessEqual,
        );
        let triangle_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "triangle pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::CompareFunction::Less,
        );

        Self {
            bind_group_layout,
            line_pipeline,
            triangle_pipeline,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        label: &str,
        topology: wgpu::PrimitiveTopology,
        depth_compare: wgpu::CompareFunction,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // Gizmo faces are seen from both sides
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_layout() {
        assert_eq!(std::mem::size_of::<ViewportUniforms>(), 64);
        let uniforms = ViewportUniforms::new(glam::Mat4::from_scale(glam::Vec3::splat(2.0)));
        assert_eq!(uniforms.view_proj[0][0], 2.0);
        assert_eq!(ViewportUniforms::default().view_proj[3][3], 1.0);
    }
}
