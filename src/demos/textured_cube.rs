//! A checkerboard textured cube under a directional light.
//!
//! The texture colours walk around the hue circle while the orbit camera
//! looks at the cube from the configured angles.

use std::time::Duration;

use cgmath::{InnerSpace, Vector3};

use crate::{
    animation::ColorCycle,
    context::{Context, InitContext},
    data_structures::{model::Material, transform::Transform},
    demos::{DemoState, Overrides, ViewConfig, report_frame_rate, settings},
    flow::{GraphicsFlow, Out},
    geometry::cube::textured_cube,
    pipelines::light::LightUniform,
    render::Render,
    resources::{
        TexturedObject,
        texture::{TEXTURE_SIZE, checkerboard},
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedCubeConfig {
    pub view: ViewConfig,
    pub clear: wgpu::Color,
    pub light_direction: [f32; 3],
    pub light_color: [f32; 3],
    pub material: Material,
    pub squares: u32,
}

impl Default for TexturedCubeConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig {
                radius: 0.5,
                radius_range: (0.05, 2.0),
                theta: 0.0,
                phi: 0.0,
                bounds: [-0.5, 0.5, -0.5, 0.5],
                near: 0.05,
                far: 2.05,
                ortho_depth: 1.0,
                ortho_ratio: 1.0,
                orthographic: true,
            },
            clear: wgpu::Color::BLACK,
            light_direction: Vector3::new(1.0, 1.0, 1.0).normalize().into(),
            light_color: [1.0; 3],
            material: Material::default(),
            squares: 8,
        }
    }
}

impl TexturedCubeConfig {
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        self.view.apply(overrides);
        self
    }
}

pub struct TexturedCube {
    config: TexturedCubeConfig,
    cube: TexturedObject,
    colors: ColorCycle,
}

impl TexturedCube {
    pub fn new(init: &InitContext, config: TexturedCubeConfig) -> anyhow::Result<Self> {
        let img = checkerboard(TEXTURE_SIZE, config.squares, [230, 40, 40], [240, 240, 240]);
        let cube = TexturedObject::new(
            init,
            "textured cube",
            &textured_cube(),
            &img,
            Transform::new(),
            config.material,
        )?;
        Ok(Self {
            config,
            cube,
            colors: ColorCycle::default(),
        })
    }
}

impl GraphicsFlow<DemoState> for TexturedCube {
    fn on_init(&mut self, ctx: &mut Context, _: &mut DemoState) -> Out {
        self.config.view.install(ctx);
        ctx.set_light(
            LightUniform::directional(self.config.light_direction),
            self.config.light_color,
        );
        self.cube
            .write_to_buffer(&ctx.queue, ctx.light.color, self.colors.hue_matrix());
        settings(self.config.clear)
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, _: Duration) -> Out {
        state.frames += 1;
        self.colors.advance();
        self.cube
            .write_to_buffer(&ctx.queue, ctx.light.color, self.colors.hue_matrix());
        Out::Empty
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        report_frame_rate("textured cube", ctx, state);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::Lit(self.cube.as_lit(true))
    }
}
