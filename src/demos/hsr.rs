//! Hidden surface removal with the painter's algorithm.
//!
//! 27 cubes in a 3x3x3 grid are merged into one triangle list that is sorted
//! back to front before every frame and drawn without a depth buffer. Every
//! cube carries its own random material, one of the planet textures and the
//! pick id `index + 1`. The whole grid turns around the y axis. Clicking a
//! cube selects it and draws it larger; clicking it again clears the
//! selection.

use std::time::Duration;

use cgmath::{Deg, Matrix3, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};
use wgpu::util::DeviceExt;

use crate::{
    context::{Context, InitContext},
    data_structures::{model::Material, transform::Transform},
    demos::{DemoState, Overrides, ViewConfig, report_frame_rate, settings},
    flow::{GraphicsFlow, Out},
    geometry::{
        cube::textured_cube,
        painter::{SceneTriangle, flatten, sort_back_to_front, update_depths},
    },
    pick::NO_PICK,
    pipelines::light::LightUniform,
    render::{Painter, Render},
    resources::{
        BoundTexture,
        texture::{PLANET_LAYERS, TEXTURE_SIZE, planet_layers},
    },
};

pub const GRID_SIDE: usize = 3;
pub const CUBE_COUNT: usize = GRID_SIDE * GRID_SIDE * GRID_SIDE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsrConfig {
    pub view: ViewConfig,
    pub clear: wgpu::Color,
    pub light_direction: [f32; 3],
    pub light_color: [f32; 3],
    /// Distance between the centres of neighbouring cubes.
    pub spacing: f32,
    pub cube_scale: f32,
    pub selected_scale: f32,
    /// Degrees the grid turns around the y axis per frame.
    pub spin: f32,
    pub time_scale: f32,
    /// Seeds materials and texture choice; `None` picks new ones every run.
    pub seed: Option<u64>,
}

impl Default for HsrConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig {
                radius: 5.0,
                radius_range: (1.5, 15.0),
                theta: 0.0,
                phi: 0.0,
                bounds: [-60.0, 60.0, -30.0, 30.0],
                near: 0.5,
                far: 20.0,
                ortho_depth: 20.0,
                ortho_ratio: 20.0,
                orthographic: false,
            },
            clear: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
            light_direction: [0.0, 0.0, 10.0],
            light_color: [1.0; 3],
            spacing: 1.5,
            cube_scale: 4.0,
            selected_scale: 1.5,
            spin: 0.25,
            time_scale: 1.0,
            seed: None,
        }
    }
}

impl HsrConfig {
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        self.view.apply(overrides);
        if let Some(time_scale) = overrides.time_scale {
            self.time_scale = time_scale;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }
}

/// Centre of cube `index`, the grid being centred on the origin.
pub fn grid_position(index: usize, spacing: f32) -> Vector3<f32> {
    let cell = |i: usize| (i % GRID_SIDE) as f32 - (GRID_SIDE - 1) as f32 / 2.0;
    Vector3::new(
        cell(index),
        cell(index / GRID_SIDE),
        cell(index / (GRID_SIDE * GRID_SIDE)),
    ) * spacing
}

/// Ambient 0.3, diffuse in `[0.6, 0.9)`, specular in `[0, 1)` and shininess
/// in `[2, 22)`.
pub fn random_material<R: Rng + ?Sized>(rng: &mut R) -> Material {
    let mut channels =
        |scale: f32, offset: f32| [(); 3].map(|_| rng.r#gen::<f32>() * scale + offset);
    let diffuse = channels(0.3, 0.6);
    let specular = channels(1.0, 0.0);
    let shininess = rng.r#gen::<f32>() * 20.0 + 2.0;
    Material::new([0.3; 3], diffuse, specular, shininess)
}

/// One cube of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsrCube {
    pub id: u32,
    pub transform: Transform,
    pub material: Material,
    pub texture_layer: u32,
}

impl HsrCube {
    /// The transform the cube is drawn with once the grid has turned by
    /// `grid_angle` degrees. Grid cubes only ever rotate around y, so turning
    /// the grid adds to that angle.
    pub fn drawn_transform(
        &self,
        selected: Option<u32>,
        selected_scale: f32,
        grid_angle: f32,
    ) -> Transform {
        let mut transform = self.transform;
        transform.translation = Matrix3::from_angle_y(Deg(grid_angle)) * transform.translation;
        transform.rotation.y += grid_angle;
        if selected == Some(self.id) {
            transform.scale *= selected_scale;
        }
        transform
    }
}

/// Places the cubes on the grid and rolls their materials and textures.
pub fn build_cubes<R: Rng + ?Sized>(config: &HsrConfig, rng: &mut R) -> Vec<HsrCube> {
    (0..CUBE_COUNT)
        .map(|index| HsrCube {
            id: index as u32 + 1,
            transform: Transform::from(grid_position(index, config.spacing))
                .with_scale(config.cube_scale),
            material: random_material(&mut *rng),
            texture_layer: rng.gen_range(0..PLANET_LAYERS as u32),
        })
        .collect()
}

/// The triangles of every cube, in cube order.
pub fn scene_triangles(cubes: &[HsrCube]) -> Vec<SceneTriangle> {
    let template = textured_cube();
    cubes
        .iter()
        .flat_map(|cube| {
            SceneTriangle::from_mesh(
                &template,
                cube.transform,
                cube.material,
                cube.texture_layer,
                cube.id,
            )
        })
        .collect()
}

pub struct HsrScene {
    config: HsrConfig,
    cubes: Vec<HsrCube>,
    triangles: Vec<SceneTriangle>,
    ids: Vec<u32>,
    selected: Option<u32>,
    /// Degrees the grid has turned around y.
    grid_angle: f32,
    vertex_buffer: wgpu::Buffer,
    amount: u32,
    texture: BoundTexture,
}

impl HsrScene {
    pub fn new(init: &InitContext, config: HsrConfig) -> anyhow::Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cubes = build_cubes(&config, &mut rng);
        let triangles = scene_triangles(&cubes);
        let ids = cubes.iter().map(|cube| cube.id).collect();

        let layers = planet_layers(TEXTURE_SIZE, rng.r#gen());
        let texture = BoundTexture::layers(init, &layers, "planet layers")?;

        // the buffer keeps its size, only the order of the triangles changes
        let vertices = flatten(&triangles, config.light_color);
        let vertex_buffer = init
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("HSR Scene Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        log::info!(
            "{} cubes with {} triangles in the painter's scene",
            cubes.len(),
            triangles.len()
        );

        Ok(Self {
            config,
            cubes,
            triangles,
            ids,
            selected: None,
            grid_angle: 0.0,
            vertex_buffer,
            amount: vertices.len() as u32,
            texture,
        })
    }

    /// Applies the cube transforms, sorts for the current camera and uploads
    /// the scene.
    fn write_to_buffer(&mut self, ctx: &Context) {
        for triangle in self.triangles.iter_mut() {
            let cube = triangle
                .object_id
                .checked_sub(1)
                .and_then(|index| self.cubes.get(index as usize));
            if let Some(cube) = cube {
                triangle.transform =
                    cube.drawn_transform(self.selected, self.config.selected_scale, self.grid_angle);
            }
        }
        let camera = &ctx.camera.camera;
        update_depths(&mut self.triangles, &camera.look_at(), camera.translation);
        sort_back_to_front(&mut self.triangles);
        let vertices = flatten(&self.triangles, ctx.light.color);
        ctx.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }
}

impl GraphicsFlow<DemoState> for HsrScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut DemoState) -> Out {
        self.config.view.install(ctx);
        ctx.set_light(
            LightUniform::directional(self.config.light_direction),
            self.config.light_color,
        );
        self.write_to_buffer(ctx);
        settings(self.config.clear)
    }

    fn on_click(&mut self, ctx: &Context, _: &mut DemoState, id: u32) -> Out {
        if id == NO_PICK {
            return Out::Empty;
        }
        // the engine already toggled the selection
        self.selected = ctx.mouse.selected.filter(|selected| *selected == id);
        match self.selected {
            Some(id) => log::info!("selected cube {}", id),
            None => log::info!("cleared selection of cube {}", id),
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, _: Duration) -> Out {
        state.frames += 1;
        self.grid_angle = (self.grid_angle + self.config.spin * self.config.time_scale) % 360.0;
        self.write_to_buffer(ctx);
        Out::Empty
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        log::debug!("grid turned {:.1} degrees", self.grid_angle);
        report_frame_rate("hsr", ctx, state);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::Painter(Painter {
            vertex: &self.vertex_buffer,
            amount: self.amount,
            texture: &self.texture.bind_group,
            ids: &self.ids,
        })
    }
}
