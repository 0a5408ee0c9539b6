//! The graphics context shared by every demo.
//!
//! [`Context`] owns the wgpu device, queue and surface together with the camera,
//! the light, all bind group layouts and the pipelines built from them. Demos
//! never create pipelines themselves; they receive an [`InitContext`] to upload
//! their meshes, textures and uniforms and then describe what to draw through
//! [`crate::render::Render`].

use std::sync::Arc;

use anyhow::Context as _;
use winit::{dpi::PhysicalPosition, window::Window};

use crate::{
    camera::{CameraResources, OrbitCamera, Projection, ProjectionMode},
    data_structures::texture::{self, Texture},
    pipelines::{
        colored, lit,
        light::{LightResources, LightUniform},
        painter, pick, points,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButtonState {
    #[default]
    None,
    Left,
    Right,
}

/// Cursor position, pressed button and the last picked object.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub coords: PhysicalPosition<f64>,
    pub pressed: MouseButtonState,
    pub selected: Option<u32>,
}

impl MouseState {
    /// Selects `id`, or clears the selection if `id` was already selected.
    pub fn toggle(&mut self, id: u32) {
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
    }
}

/// Every bind group layout a demo may need to build its resources.
#[derive(Debug, Clone)]
pub struct Layouts {
    pub paint: wgpu::BindGroupLayout,
    pub colored: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
    pub texture_array: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
    pub camera: wgpu::BindGroupLayout,
    pub light: wgpu::BindGroupLayout,
}

#[derive(Debug)]
pub struct Pipelines {
    pub points: wgpu::RenderPipeline,
    pub flat: wgpu::RenderPipeline,
    pub colored: wgpu::RenderPipeline,
    pub lit: wgpu::RenderPipeline,
    pub lit_unculled: wgpu::RenderPipeline,
    pub painter: wgpu::RenderPipeline,
    pub pick: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration, layouts: &Layouts) -> Self {
        let lit = |cull_mode| {
            lit::mk_lit_pipeline(
                device,
                config,
                &layouts.texture,
                &layouts.camera,
                &layouts.light,
                &layouts.object,
                cull_mode,
            )
        };
        Self {
            points: points::mk_points_pipeline(
                device,
                config,
                &layouts.paint,
                wgpu::PrimitiveTopology::PointList,
            ),
            flat: points::mk_points_pipeline(
                device,
                config,
                &layouts.paint,
                wgpu::PrimitiveTopology::TriangleList,
            ),
            colored: colored::mk_colored_pipeline(device, config, &layouts.colored),
            lit: lit(Some(wgpu::Face::Back)),
            lit_unculled: lit(None),
            painter: painter::mk_painter_pipeline(
                device,
                config,
                &layouts.texture_array,
                &layouts.camera,
                &layouts.light,
            ),
            pick: pick::mk_pick_pipeline(device, &layouts.camera),
        }
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub layouts: Layouts,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub tick_duration_millis: u64,
    pub mouse: MouseState,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("graphics context unavailable: cannot create a surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("graphics context unavailable: no compatible adapter")?;
        log::info!("device and queue on {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("graphics context unavailable: device request failed")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // Textures are sRGB, so the surface should be too. Otherwise every colour
        // comes out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("graphics context unavailable: the surface supports no format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let projection = Projection::new(
            [-1.0, 1.0, -1.0, 1.0],
            0.1,
            10.0,
            ProjectionMode::Perspective,
        );
        let camera = CameraResources::new(&device, OrbitCamera::default(), &projection);

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let light = LightResources::new(&device, LightUniform::default(), [1.0, 1.0, 1.0]);

        let layouts = Layouts {
            paint: points::mk_bind_group_layout(&device),
            colored: colored::mk_bind_group_layout(&device),
            texture: texture::diffuse_layout(&device),
            texture_array: texture::diffuse_array_layout(&device),
            object: lit::mk_bind_group_layout(&device),
            camera: camera.bind_group_layout.clone(),
            light: light.bind_group_layout.clone(),
        };
        let pipelines = Pipelines::new(&device, &config, &layouts);

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            layouts,
            pipelines,
            clear_colour: wgpu::Color::BLACK,
            tick_duration_millis: 1000,
            mouse: MouseState::default(),
        })
    }

    /// Replaces camera and projection. The projection is fitted to the current
    /// surface aspect right away.
    pub fn set_view(&mut self, camera: OrbitCamera, mut projection: Projection) {
        projection.resize(self.config.width, self.config.height);
        self.camera.camera = camera;
        self.projection = projection;
        self.update_camera();
    }

    pub fn set_light(&mut self, uniform: LightUniform, color: [f32; 3]) {
        self.light.set(&self.queue, uniform, color);
    }

    /// Uploads the current camera and projection.
    pub fn update_camera(&mut self) {
        self.camera.write_to_buffer(&self.queue, &self.projection);
    }
}

/// The parts of the [`Context`] a demo needs while it is being constructed.
///
/// Device and queue are reference counted inside wgpu, so this is cheap to
/// create and can move into the async constructors.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub layouts: Layouts,
    pub surface_format: wgpu::TextureFormat,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            layouts: ctx.layouts.clone(),
            surface_format: ctx.config.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_twice_clears_the_selection() {
        let mut mouse = MouseState::default();
        mouse.toggle(4);
        assert_eq!(mouse.selected, Some(4));
        mouse.toggle(7);
        assert_eq!(mouse.selected, Some(7));
        mouse.toggle(7);
        assert_eq!(mouse.selected, None);
    }
}
