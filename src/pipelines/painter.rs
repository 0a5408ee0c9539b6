//! Depth-sorted triangle soup drawn without depth testing.
//!
//! Bind groups: 0 layered diffuse texture, 1 camera, 2 light.

use crate::{
    data_structures::model::Vertex,
    geometry::painter::PainterVertex,
    pipelines::basic::{depth_ignored, mk_pipeline_layout, mk_render_pipeline, primitive},
};

impl Vertex for PainterVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
            0 => Float32x4,
            1 => Float32x2,
            2 => Float32x3,
            3 => Float32x3,
            4 => Float32x3,
            5 => Float32x3,
            6 => Float32,
            7 => Uint32,
            8 => Uint32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PainterVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

pub fn mk_painter_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    texture_array_layout: &wgpu::BindGroupLayout,
    camera_layout: &wgpu::BindGroupLayout,
    light_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Painter Pipeline Layout",
        &[texture_array_layout, camera_layout, light_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Painter Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("painter.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Painter Pipeline",
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        depth_ignored(),
        &[PainterVertex::desc()],
        shader,
        primitive(wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn attributes_follow_the_struct_layout() {
        let desc = PainterVertex::desc();
        assert_eq!(desc.array_stride, 84);
        let offsets: Vec<_> = desc.attributes.iter().map(|a| a.offset as usize).collect();
        assert_eq!(
            offsets,
            vec![
                offset_of!(PainterVertex, position),
                offset_of!(PainterVertex, tex_coords),
                offset_of!(PainterVertex, normal),
                offset_of!(PainterVertex, ambient),
                offset_of!(PainterVertex, diffuse),
                offset_of!(PainterVertex, specular),
                offset_of!(PainterVertex, shininess),
                offset_of!(PainterVertex, texture_layer),
                offset_of!(PainterVertex, pick_id),
            ]
        );
    }
}
