use cgmath::Matrix4;

use crate::{
    camera::OPENGL_TO_WGPU_MATRIX,
    data_structures::{
        model::{ColorVertex, Vertex},
        transform::padded,
    },
    pipelines::basic::{depth_tested, mk_pipeline_layout, mk_render_pipeline, mk_uniform_layout, primitive},
};

/// Model matrix and hue rotation of a vertex-coloured object drawn without a camera.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColoredUniform {
    pub transform: [[f32; 4]; 4],
    pub hue: [[f32; 4]; 3],
}

impl ColoredUniform {
    /// `model` maps straight into OpenGL style clip space; the depth range is
    /// converted here.
    pub fn new(model: Matrix4<f32>, hue: cgmath::Matrix3<f32>) -> Self {
        Self {
            transform: (OPENGL_TO_WGPU_MATRIX * model).into(),
            hue: padded(hue),
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(device, wgpu::ShaderStages::VERTEX, "colored_bind_group_layout")
}

pub fn mk_colored_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    colored_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(device, "Colored Pipeline Layout", &[colored_layout]);
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Colored Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("colored.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Colored Pipeline",
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        depth_tested(),
        &[ColorVertex::desc()],
        shader,
        primitive(wgpu::PrimitiveTopology::TriangleList, None),
    )
}
