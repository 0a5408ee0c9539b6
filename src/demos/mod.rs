//! The demos shipped with the crate.
//!
//! Every demo is a single [`GraphicsFlow`] that owns its meshes, textures and
//! animation state. They never run together; the launcher picks one by name
//! through [`Demo`] and hands the command line [`Overrides`] to its
//! [`constructor`].

use anyhow::ensure;
use cgmath::Deg;

use crate::{
    camera::{OrbitCamera, Projection, ProjectionMode},
    context::Context,
    flow::{FlowConsturctor, GraphicsFlow, Out},
    resources::texture::PLANET_PALETTE,
};

pub mod cube;
pub mod earth_moon;
pub mod gasket;
pub mod hsr;
pub mod planet;
pub mod textured_cube;

pub use crate::geometry::MAX_DEPTH;

/// Every demo reports its frame rate this often.
pub const STATUS_TICK_MILLIS: u64 = 2000;

/// State shared by all flows of a running demo.
#[derive(Debug, Default)]
pub struct DemoState {
    pub frames: u64,
    frames_at_last_tick: u64,
}

impl DemoState {
    /// Frames drawn since the previous call.
    pub fn frames_since_tick(&mut self) -> u64 {
        let frames = self.frames - self.frames_at_last_tick;
        self.frames_at_last_tick = self.frames;
        frames
    }
}

/// Engine settings every demo installs from `on_init`.
pub fn settings(clear: wgpu::Color) -> Out {
    Out::Configure(Box::new(move |ctx: &mut Context| {
        ctx.clear_colour = clear;
        ctx.tick_duration_millis = STATUS_TICK_MILLIS;
    }))
}

fn frames_per_second(frames: u64, tick_millis: u64) -> f64 {
    if tick_millis == 0 {
        return 0.0;
    }
    frames as f64 * 1000.0 / tick_millis as f64
}

/// Logs the frame rate since the last tick.
pub(crate) fn report_frame_rate(name: &str, ctx: &Context, state: &mut DemoState) {
    let fps = frames_per_second(state.frames_since_tick(), ctx.tick_duration_millis);
    log::info!("{name}: {fps:.1} fps after {} frames", state.frames);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Demo {
    /// Sierpinski gasket as chaos-game points or subdivided triangles
    Gasket,
    /// Vertex coloured cube spinning, bouncing and cycling its colours
    Cube,
    /// Textured, lit cube
    TexturedCube,
    /// Textured sphere
    Planet,
    /// Earth with an orbiting moon in front of a star backdrop
    EarthMoon,
    /// 27 cubes sorted with the painter's algorithm, click to select
    Hsr,
}

impl Demo {
    /// Looks a demo up by its command line name, ignoring case.
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        <Self as clap::ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("unknown demo {name:?}"))
    }
}

/// Optional values from the command line that replace a demo's defaults.
///
/// Demos ignore the overrides that mean nothing to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub points: Option<usize>,
    pub depth: Option<u32>,
    pub seed: Option<u64>,
    pub radius: Option<f32>,
    pub theta: Option<f32>,
    pub phi: Option<f32>,
    pub orthographic: Option<bool>,
    pub time_scale: Option<f32>,
    /// Shows a banded gas giant of [`PLANET_PALETTE`] instead of the earth.
    pub palette: Option<usize>,
}

impl Overrides {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(radius) = self.radius {
            ensure!(
                radius.is_finite() && radius > 0.0,
                "camera radius must be positive, got {radius}"
            );
        }
        if let Some(depth) = self.depth {
            ensure!(
                depth <= MAX_DEPTH,
                "subdivision depth must be at most {MAX_DEPTH}, got {depth}"
            );
        }
        if let Some(points) = self.points {
            ensure!(points > 0, "the gasket needs at least one point");
        }
        for (name, angle) in [("theta", self.theta), ("phi", self.phi)] {
            if let Some(angle) = angle {
                ensure!(angle.is_finite(), "{name} must be a finite angle");
            }
        }
        if let Some(time_scale) = self.time_scale {
            ensure!(
                time_scale.is_finite(),
                "time scale must be finite, got {time_scale}"
            );
        }
        if let Some(palette) = self.palette {
            ensure!(
                palette < PLANET_PALETTE.len(),
                "palette must be below {}, got {palette}",
                PLANET_PALETTE.len()
            );
        }
        Ok(())
    }
}

/// Camera and projection of a 3D demo.
///
/// `near`/`far` are the perspective clip planes. The orthographic projection
/// keeps everything within `ortho_depth` of the eye and divides `bounds` by
/// `ortho_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub radius: f32,
    pub radius_range: (f32, f32),
    /// Degrees around the y axis.
    pub theta: f32,
    /// Degrees above the xz plane.
    pub phi: f32,
    pub bounds: [f32; 4],
    pub near: f32,
    pub far: f32,
    pub ortho_depth: f32,
    pub ortho_ratio: f32,
    pub orthographic: bool,
}

impl ViewConfig {
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(radius) = overrides.radius {
            self.radius = radius;
        }
        if let Some(theta) = overrides.theta {
            self.theta = theta;
        }
        if let Some(phi) = overrides.phi {
            self.phi = phi;
        }
        if let Some(orthographic) = overrides.orthographic {
            self.orthographic = orthographic;
        }
    }

    pub fn camera(&self) -> OrbitCamera {
        let (min, max) = self.radius_range;
        OrbitCamera::new(self.radius, Deg(self.theta), Deg(self.phi)).with_radius_range(min, max)
    }

    pub fn projection(&self) -> Projection {
        if self.orthographic {
            Projection::new(
                self.bounds,
                self.near,
                self.ortho_depth,
                ProjectionMode::Orthographic {
                    ratio: self.ortho_ratio,
                },
            )
        } else {
            Projection::new(self.bounds, self.near, self.far, ProjectionMode::Perspective)
        }
    }

    /// Installs camera and projection in the context.
    pub fn install(&self, ctx: &mut Context) {
        log::info!(
            "{} view, radius {} theta {} phi {}",
            if self.orthographic { "orthographic" } else { "perspective" },
            self.radius,
            self.theta,
            self.phi
        );
        ctx.set_view(self.camera(), self.projection());
    }
}

fn boxed<F>(flow: anyhow::Result<F>) -> anyhow::Result<Box<dyn GraphicsFlow<DemoState>>>
where
    F: GraphicsFlow<DemoState> + 'static,
{
    Ok(Box::new(flow?))
}

/// Builds the flow constructor of `demo` with `overrides` applied.
pub fn constructor(
    demo: Demo,
    overrides: &Overrides,
) -> anyhow::Result<FlowConsturctor<DemoState>> {
    overrides.validate()?;
    log::info!("starting {demo:?} with {overrides:?}");
    let constructor: FlowConsturctor<DemoState> = match demo {
        Demo::Gasket => {
            let config = gasket::GasketConfig::default().with_overrides(overrides);
            Box::new(move |init| Box::pin(async move { boxed(gasket::Gasket::new(&init, config)) }))
        }
        Demo::Cube => {
            let config = cube::CubeConfig::default();
            Box::new(move |init| {
                Box::pin(async move { boxed(Ok(cube::SpinningCube::new(&init, config))) })
            })
        }
        Demo::TexturedCube => {
            let config = textured_cube::TexturedCubeConfig::default().with_overrides(overrides);
            Box::new(move |init| {
                Box::pin(async move { boxed(textured_cube::TexturedCube::new(&init, config)) })
            })
        }
        Demo::Planet => {
            let config = planet::PlanetConfig::default().with_overrides(overrides);
            Box::new(move |init| Box::pin(async move { boxed(planet::Planet::new(&init, config)) }))
        }
        Demo::EarthMoon => {
            let config = earth_moon::EarthMoonConfig::default().with_overrides(overrides);
            Box::new(move |init| {
                Box::pin(async move { boxed(earth_moon::EarthMoon::new(&init, config)) })
            })
        }
        Demo::Hsr => {
            let config = hsr::HsrConfig::default().with_overrides(overrides);
            Box::new(move |init| Box::pin(async move { boxed(hsr::HsrScene::new(&init, config)) }))
        }
    };
    Ok(constructor)
}
