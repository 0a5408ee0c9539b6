use crate::{
    data_structures::model::{PointVertex, Vertex},
    pipelines::basic::{depth_ignored, mk_pipeline_layout, mk_render_pipeline, mk_uniform_layout, primitive},
};

/// Single colour for every fragment of a 2D primitive.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PaintUniform {
    pub color: [f32; 4],
}

impl From<wgpu::Color> for PaintUniform {
    fn from(c: wgpu::Color) -> Self {
        Self {
            color: [c.r as f32, c.g as f32, c.b as f32, c.a as f32],
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(device, wgpu::ShaderStages::FRAGMENT, "paint_bind_group_layout")
}

/**
 * 2D positions straight into clip space. `PointList` draws the chaos game,
 * `TriangleList` the subdivided gasket.
 */
pub fn mk_points_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    paint_layout: &wgpu::BindGroupLayout,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(device, "Points Pipeline Layout", &[paint_layout]);
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Points Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("points.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Points Pipeline",
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        depth_ignored(),
        &[PointVertex::desc()],
        shader,
        primitive(topology, None),
    )
}
