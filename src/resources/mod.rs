//! GPU resources shared by the demos.
//!
//! The demos never load files: [`texture`] generates every image in-process
//! and the helpers below upload images and meshes through an [`InitContext`].

use image::RgbaImage;

use crate::{
    context::InitContext,
    data_structures::{
        model::{Material, Mesh, TexturedVertex},
        texture::Texture,
        transform::Transform,
    },
    pipelines::lit::ObjectResources,
    render::Lit,
};

pub mod texture;

/// An uploaded texture together with its bind group.
#[derive(Debug)]
pub struct BoundTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl BoundTexture {
    /// Uploads a single image for the lit pipeline.
    pub fn new(init: &InitContext, img: &RgbaImage, label: &str) -> anyhow::Result<Self> {
        let texture = Texture::from_image(&init.device, &init.queue, img, Some(label))?;
        let bind_group = texture.bind_group(&init.device, &init.layouts.texture, Some(label))?;
        Ok(Self {
            texture,
            bind_group,
        })
    }

    /// Uploads equally sized images as one texture array for the painter pipeline.
    pub fn layers(init: &InitContext, layers: &[RgbaImage], label: &str) -> anyhow::Result<Self> {
        let texture = Texture::from_layers(&init.device, &init.queue, layers, Some(label))?;
        let bind_group =
            texture.bind_group(&init.device, &init.layouts.texture_array, Some(label))?;
        Ok(Self {
            texture,
            bind_group,
        })
    }
}

/// A textured mesh, its diffuse map and its per-object uniform.
#[derive(Debug)]
pub struct TexturedObject {
    pub mesh: Mesh,
    pub texture: BoundTexture,
    pub object: ObjectResources,
    pub transform: Transform,
}

impl TexturedObject {
    pub fn new(
        init: &InitContext,
        name: &str,
        vertices: &[TexturedVertex],
        img: &RgbaImage,
        transform: Transform,
        material: Material,
    ) -> anyhow::Result<Self> {
        log::info!("uploading {} ({} vertices)", name, vertices.len());
        let mesh = Mesh::new(&init.device, name, vertices);
        let texture = BoundTexture::new(init, img, name)?;
        // the light colour is multiplied in with the first update
        let object = ObjectResources::new(
            &init.device,
            &init.layouts.object,
            &transform,
            material,
            [1.0; 3],
            name,
        );
        Ok(Self {
            mesh,
            texture,
            object,
            transform,
        })
    }

    /// Uploads the current transform, lit by `light_color` and tinted by `hue`.
    pub fn write_to_buffer(
        &mut self,
        queue: &wgpu::Queue,
        light_color: [f32; 3],
        hue: cgmath::Matrix3<f32>,
    ) {
        self.object.update(queue, &self.transform, light_color, hue);
    }

    pub fn as_lit(&self, culled: bool) -> Lit<'_> {
        Lit {
            mesh: &self.mesh,
            texture: &self.texture.bind_group,
            object: self.object.bind_group(),
            culled,
        }
    }
}
