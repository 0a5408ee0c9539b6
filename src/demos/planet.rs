//! A single textured sphere built by subdividing an octahedron.

use std::time::Duration;

use cgmath::{InnerSpace, Vector3};
use image::RgbaImage;

use crate::{
    animation::ColorCycle,
    context::{Context, InitContext},
    data_structures::{model::Material, transform::Transform},
    demos::{DemoState, Overrides, ViewConfig, report_frame_rate, settings},
    flow::{GraphicsFlow, Out},
    geometry::sphere::uv_sphere_mesh,
    pipelines::light::LightUniform,
    render::Render,
    resources::{
        TexturedObject,
        texture::{PLANET_PALETTE, TEXTURE_SIZE, banded_planet, earth},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetSurface {
    Earth,
    /// One of the gas giants of [`PLANET_PALETTE`].
    Banded { palette: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetConfig {
    pub view: ViewConfig,
    pub depth: u32,
    pub surface: PlanetSurface,
    pub seed: u64,
    pub clear: wgpu::Color,
    pub light_direction: [f32; 3],
    pub light_color: [f32; 3],
    pub material: Material,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig {
                radius: 3.0,
                radius_range: (1.5, 6.0),
                theta: 0.0,
                phi: 0.0,
                bounds: [-6.0, 6.0, -3.0, 3.0],
                near: 1.0,
                far: 6.0,
                ortho_depth: 6.0,
                ortho_ratio: 1.0,
                orthographic: true,
            },
            depth: 4,
            surface: PlanetSurface::Earth,
            seed: 7,
            clear: wgpu::Color::BLACK,
            light_direction: Vector3::new(5.0, 5.0, 5.0).normalize().into(),
            light_color: [1.0; 3],
            material: Material::default(),
        }
    }
}

impl PlanetConfig {
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        self.view.apply(overrides);
        if let Some(depth) = overrides.depth {
            self.depth = depth;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(palette) = overrides.palette {
            self.surface = PlanetSurface::Banded { palette };
        }
        self
    }

    pub fn surface_image(&self) -> RgbaImage {
        let (width, height) = (2 * TEXTURE_SIZE, TEXTURE_SIZE);
        match self.surface {
            PlanetSurface::Earth => earth(width, height, self.seed),
            PlanetSurface::Banded { palette } => {
                let (base, accent) = PLANET_PALETTE[palette % PLANET_PALETTE.len()];
                banded_planet(width, height, base, accent, self.seed)
            }
        }
    }
}

pub struct Planet {
    config: PlanetConfig,
    sphere: TexturedObject,
    colors: ColorCycle,
}

impl Planet {
    pub fn new(init: &InitContext, config: PlanetConfig) -> anyhow::Result<Self> {
        let sphere = TexturedObject::new(
            init,
            "planet",
            &uv_sphere_mesh(config.depth)?,
            &config.surface_image(),
            Transform::new(),
            config.material,
        )?;
        Ok(Self {
            config,
            sphere,
            colors: ColorCycle::default(),
        })
    }

    /// Walks the surface colours one step around the hue circle.
    fn cycle_colors(&mut self, ctx: &Context) {
        self.colors.advance();
        self.sphere
            .write_to_buffer(&ctx.queue, ctx.light.color, self.colors.hue_matrix());
    }
}

impl GraphicsFlow<DemoState> for Planet {
    fn on_init(&mut self, ctx: &mut Context, _: &mut DemoState) -> Out {
        self.config.view.install(ctx);
        ctx.set_light(
            LightUniform::directional(self.config.light_direction),
            self.config.light_color,
        );
        self.sphere
            .write_to_buffer(&ctx.queue, ctx.light.color, self.colors.hue_matrix());
        settings(self.config.clear)
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, _: Duration) -> Out {
        state.frames += 1;
        self.cycle_colors(ctx);
        Out::Empty
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        log::debug!("planet hue at {:.2} rad", self.colors.theta);
        report_frame_rate("planet", ctx, state);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::Lit(self.sphere.as_lit(true))
    }
}
