use crate::{
    data_structures::model::Vertex,
    geometry::painter::PainterVertex,
    pipelines::basic::{mk_pipeline_layout, mk_render_pipeline, primitive},
};

pub const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Uint;

/**
 * Draws the sorted scene with every fragment set to the pick id of its
 * triangle. There is no depth attachment: the triangles arrive back to front,
 * so the nearest one is written last and wins.
 */
pub fn mk_pick_pipeline(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Render Pipeline Layout (For picking)",
        &[camera_bind_group_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Pick Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("pick.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Pick Pipeline",
        &layout,
        PICK_FORMAT,
        None,
        None,
        &[PainterVertex::desc()],
        shader,
        primitive(wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
    )
}
