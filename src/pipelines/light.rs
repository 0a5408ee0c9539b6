use crate::pipelines::basic::{UniformResources, mk_uniform_layout};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum LightKind {
    /// `position` is a direction towards the light.
    Directional = 0,
    /// `position` is a world-space point.
    Point = 1,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    // fills the vec3 padding slot
    pub kind: u32,
}

impl LightUniform {
    pub fn directional(direction: [f32; 3]) -> Self {
        Self {
            position: direction,
            kind: LightKind::Directional as u32,
        }
    }

    pub fn point(position: [f32; 3]) -> Self {
        Self {
            position,
            kind: LightKind::Point as u32,
        }
    }
}

/// The scene light.
///
/// Only position and kind go to the GPU. The colour stays on the CPU where it is
/// multiplied into the material products of every object.
#[derive(Debug)]
pub struct LightResources {
    pub color: [f32; 3],
    pub uniform: UniformResources<LightUniform>,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform, color: [f32; 3]) -> Self {
        let bind_group_layout = mk_bind_group_layout(device);
        let uniform = UniformResources::new(device, &bind_group_layout, uniform, "light_bind_group");
        Self {
            color,
            uniform,
            bind_group_layout,
        }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.uniform.bind_group
    }

    pub fn set(&mut self, queue: &wgpu::Queue, uniform: LightUniform, color: [f32; 3]) {
        self.color = color;
        self.uniform.write(queue, uniform);
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        let d = 1.0 / 3.0_f32.sqrt();
        Self::directional([d, d, d])
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(
        device,
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        "light_bind_group_layout",
    )
}
