//! Vertex records, GPU meshes and materials.
//!
//! All demos upload one of three vertex records:
//!
//! - [`PointVertex`] is a bare 2D position used by the gasket demo
//! - [`ColorVertex`] is a homogeneous position with an RGBA colour (spinning cube)
//! - [`TexturedVertex`] is the interleaved position/uv/normal record used by every
//!   lit demo. Its layout (stride 36, offsets 0/16/24) matches the classic
//!   WebGL demos so that the same geometry code feeds both.

use wgpu::util::DeviceExt;

/// Describes how a vertex record is laid out in a GPU buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 2],
}

impl Vertex for PointVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

impl From<[f32; 2]> for PointVertex {
    fn from(position: [f32; 2]) -> Self {
        Self { position }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex for ColorVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Interleaved position (homogeneous), texture coordinate and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 4],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl TexturedVertex {
    pub const STRIDE: usize = 36;
    pub const POSITION_OFFSET: usize = 0;
    pub const TEX_COORDS_OFFSET: usize = 16;
    pub const NORMAL_OFFSET: usize = 24;
}

/**
 * offset: each attribute starts right after the previous one, there is no padding.
 * stride: 4 floats position + 2 floats uv + 3 floats normal = 36 bytes
 */
impl Vertex for TexturedVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: Self::POSITION_OFFSET as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: Self::TEX_COORDS_OFFSET as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: Self::NORMAL_OFFSET as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A vertex buffer plus the number of vertices it holds.
///
/// Meshes are uploaded once and drawn as plain (non-indexed) lists unless an
/// index buffer is attached.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub num_elements: u32,
}

impl Mesh {
    pub fn new<V: bytemuck::Pod>(device: &wgpu::Device, name: &str, vertices: &[V]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer: None,
            num_elements: vertices.len() as u32,
        }
    }

    pub fn indexed<V: bytemuck::Pod>(
        device: &wgpu::Device,
        name: &str,
        vertices: &[V],
        indices: &[u16],
    ) -> Self {
        let mut mesh = Self::new(device, name, vertices);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        mesh.index_buffer = Some(index_buffer);
        mesh.num_elements = indices.len() as u32;
        mesh
    }
}

pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        if mesh.num_elements == 0 {
            log::warn!("mesh {} has no elements to draw", mesh.name);
            return;
        }
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        match &mesh.index_buffer {
            Some(index_buffer) => {
                self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                self.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
            None => self.draw(0..mesh.num_elements, 0..1),
        }
    }
}

/// Phong material coefficients.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Material {
    pub const fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// Multiplies each coefficient with the light colour (component-wise).
    pub fn products(&self, light: [f32; 3]) -> MaterialProducts {
        let mul = |m: [f32; 3]| [m[0] * light[0], m[1] * light[1], m[2] * light[2]];
        MaterialProducts {
            ambient: mul(self.ambient),
            diffuse: mul(self.diffuse),
            specular: mul(self.specular),
            shininess: self.shininess,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.2; 3], [0.9; 3], [0.3; 3], 16.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MaterialProducts {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}
