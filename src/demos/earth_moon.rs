//! The earth spinning under a point light while the moon orbits it, all
//! inside a sphere of stars.

use std::time::Duration;

use cgmath::Matrix3;

use crate::{
    animation::OrbitState,
    context::{Context, InitContext},
    data_structures::{model::Material, transform::Transform},
    demos::{DemoState, Overrides, ViewConfig, report_frame_rate, settings},
    flow::{GraphicsFlow, Out},
    geometry::sphere::uv_sphere_mesh,
    pipelines::light::LightUniform,
    render::Render,
    resources::{
        TexturedObject,
        texture::{TEXTURE_SIZE, earth, moon, star_field},
    },
};

pub const EARTH_MATERIAL: Material = Material::new([0.1; 3], [0.85; 3], [0.7; 3], 3.0);
pub const MOON_MATERIAL: Material = Material::new([0.1; 3], [0.9; 3], [0.0; 3], 1.0);
/// The stars only glow with the ambient term.
pub const STAR_MATERIAL: Material = Material::new([0.3; 3], [0.0; 3], [0.0; 3], 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthMoonConfig {
    pub view: ViewConfig,
    pub depth: u32,
    pub time_scale: f32,
    pub seed: u64,
    pub clear: wgpu::Color,
    pub light_position: [f32; 3],
    pub light_color: [f32; 3],
    /// Radius of the star sphere. It has to enclose the camera.
    pub star_radius: f32,
    pub star_density: f32,
}

impl Default for EarthMoonConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig {
                radius: 3.0,
                radius_range: (1.5, 90.0),
                theta: 0.0,
                phi: 0.0,
                bounds: [-60.0, 60.0, -30.0, 30.0],
                near: 0.5,
                far: 300.0,
                ortho_depth: 300.0,
                ortho_ratio: 10.0,
                orthographic: false,
            },
            depth: 5,
            time_scale: 1.0,
            seed: 11,
            clear: wgpu::Color::BLACK,
            light_position: [0.0, 0.0, 20.0],
            light_color: [1.0; 3],
            star_radius: 100.0,
            star_density: 0.002,
        }
    }
}

impl EarthMoonConfig {
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        self.view.apply(overrides);
        if let Some(depth) = overrides.depth {
            self.depth = depth;
        }
        if let Some(time_scale) = overrides.time_scale {
            self.time_scale = time_scale;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        self
    }
}

pub struct EarthMoon {
    config: EarthMoonConfig,
    orbit: OrbitState,
    earth: TexturedObject,
    moon: TexturedObject,
    stars: TexturedObject,
}

impl EarthMoon {
    pub fn new(init: &InitContext, config: EarthMoonConfig) -> anyhow::Result<Self> {
        let orbit = OrbitState::new(config.time_scale);
        let sphere = uv_sphere_mesh(config.depth)?;
        let (width, height) = (2 * TEXTURE_SIZE, TEXTURE_SIZE);

        let earth = TexturedObject::new(
            init,
            "earth",
            &sphere,
            &earth(width, height, config.seed),
            orbit.earth,
            EARTH_MATERIAL,
        )?;
        let moon = TexturedObject::new(
            init,
            "moon",
            &sphere,
            &moon(width, height, config.seed.wrapping_add(1)),
            orbit.moon,
            MOON_MATERIAL,
        )?;
        let stars = TexturedObject::new(
            init,
            "stars",
            &sphere,
            &star_field(
                2 * width,
                2 * height,
                config.star_density,
                config.seed.wrapping_add(2),
            ),
            Transform::new().with_scale(config.star_radius),
            STAR_MATERIAL,
        )?;

        Ok(Self {
            config,
            orbit,
            earth,
            moon,
            stars,
        })
    }

    fn write_to_buffers(&mut self, ctx: &Context) {
        let identity = Matrix3::from_scale(1.0);
        for object in [&mut self.earth, &mut self.moon, &mut self.stars] {
            object.write_to_buffer(&ctx.queue, ctx.light.color, identity);
        }
    }
}

impl GraphicsFlow<DemoState> for EarthMoon {
    fn on_init(&mut self, ctx: &mut Context, _: &mut DemoState) -> Out {
        self.config.view.install(ctx);
        ctx.set_light(
            LightUniform::point(self.config.light_position),
            self.config.light_color,
        );
        self.write_to_buffers(ctx);
        settings(self.config.clear)
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, _: Duration) -> Out {
        state.frames += 1;
        self.orbit.advance();
        self.earth.transform = self.orbit.earth;
        self.moon.transform = self.orbit.moon;
        self.write_to_buffers(ctx);
        Out::Empty
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        log::debug!("moon at {:.2} degrees", self.orbit.moon_theta);
        report_frame_rate("earth and moon", ctx, state);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::Lits(vec![
            self.earth.as_lit(true),
            self.moon.as_lit(true),
            // seen from the inside
            self.stars.as_lit(false),
        ])
    }
}
