//! Textured Blinn-Phong objects.
//!
//! Bind groups: 0 diffuse texture, 1 camera, 2 light, 3 per-object uniform.

use cgmath::Matrix3;

use crate::{
    data_structures::{
        model::{Material, TexturedVertex, Vertex},
        transform::{Transform, padded},
    },
    pipelines::basic::{
        UniformResources, depth_tested, mk_pipeline_layout, mk_render_pipeline, mk_uniform_layout,
        primitive,
    },
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub hue: [[f32; 4]; 3],
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub diffuse: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    pub _padding: u32,
    pub specular: [f32; 3],
    pub _padding2: u32,
}

impl ObjectUniform {
    pub fn new(transform: &Transform, material: &Material, light_color: [f32; 3], hue: Matrix3<f32>) -> Self {
        let raw = transform.to_raw();
        let products = material.products(light_color);
        Self {
            model: raw.model,
            normal: raw.normal,
            hue: padded(hue),
            ambient: products.ambient,
            shininess: products.shininess,
            diffuse: products.diffuse,
            _padding: 0,
            specular: products.specular,
            _padding2: 0,
        }
    }
}

/// A lit object's uniform plus the material it was built from.
#[derive(Debug)]
pub struct ObjectResources {
    pub material: Material,
    pub uniform: UniformResources<ObjectUniform>,
}

impl ObjectResources {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        transform: &Transform,
        material: Material,
        light_color: [f32; 3],
        label: &str,
    ) -> Self {
        let uniform = ObjectUniform::new(transform, &material, light_color, Matrix3::from_scale(1.0));
        Self {
            material,
            uniform: UniformResources::new(device, layout, uniform, label),
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, transform: &Transform, light_color: [f32; 3], hue: Matrix3<f32>) {
        let uniform = ObjectUniform::new(transform, &self.material, light_color, hue);
        self.uniform.write(queue, uniform);
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.uniform.bind_group
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(
        device,
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        "object_bind_group_layout",
    )
}

/// `cull_mode: None` draws inside faces too, which the star backdrop needs
/// because the camera sits within it.
pub fn mk_lit_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    texture_layout: &wgpu::BindGroupLayout,
    camera_layout: &wgpu::BindGroupLayout,
    light_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
    cull_mode: Option<wgpu::Face>,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(
        device,
        "Lit Pipeline Layout",
        &[texture_layout, camera_layout, light_layout, object_layout],
    );
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Lit Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("lit.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Lit Pipeline",
        &layout,
        config.format,
        Some(wgpu::BlendState::REPLACE),
        depth_tested(),
        &[TexturedVertex::desc()],
        shader,
        primitive(wgpu::PrimitiveTopology::TriangleList, cull_mode),
    )
}
