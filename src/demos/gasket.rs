//! The Sierpinski gasket in two dimensions.
//!
//! By default the chaos game scatters 50000 red points over a white canvas.
//! Passing a subdivision depth draws the gasket as a filled triangle list
//! instead.

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    context::{Context, InitContext},
    data_structures::model::{Mesh, PointVertex},
    demos::{DemoState, Overrides, report_frame_rate, settings},
    flow::{GraphicsFlow, Out},
    geometry::gasket::{DEFAULT_CORNERS, DEFAULT_POINTS, chaos_game, subdivide},
    pipelines::{basic::UniformResources, points::PaintUniform},
    render::{Flat, Render},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasketMode {
    ChaosGame { points: usize },
    Subdivision { depth: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasketConfig {
    pub mode: GasketMode,
    pub corners: [[f32; 2]; 3],
    /// Seeds the chaos game; `None` draws a different gasket every run.
    pub seed: Option<u64>,
    pub paint: wgpu::Color,
    pub clear: wgpu::Color,
}

impl Default for GasketConfig {
    fn default() -> Self {
        Self {
            mode: GasketMode::ChaosGame {
                points: DEFAULT_POINTS,
            },
            corners: DEFAULT_CORNERS,
            seed: None,
            paint: wgpu::Color::RED,
            clear: wgpu::Color::WHITE,
        }
    }
}

impl GasketConfig {
    /// A depth switches to subdivision, a point count back to the chaos game.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(depth) = overrides.depth {
            self.mode = GasketMode::Subdivision { depth };
        }
        if let Some(points) = overrides.points {
            self.mode = GasketMode::ChaosGame { points };
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }

    /// The vertices of the gasket in clip space.
    pub fn vertices(&self) -> anyhow::Result<Vec<PointVertex>> {
        let positions = match self.mode {
            GasketMode::ChaosGame { points } => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                chaos_game(self.corners, points, &mut rng)
            }
            GasketMode::Subdivision { depth } => subdivide(self.corners, depth)?,
        };
        Ok(positions.into_iter().map(PointVertex::from).collect())
    }
}

pub struct Gasket {
    config: GasketConfig,
    mesh: Mesh,
    paint: UniformResources<PaintUniform>,
}

impl Gasket {
    pub fn new(init: &InitContext, config: GasketConfig) -> anyhow::Result<Self> {
        let vertices = config.vertices()?;
        anyhow::ensure!(!vertices.is_empty(), "the gasket has no vertices");
        log::info!("gasket {:?} with {} vertices", config.mode, vertices.len());
        let mesh = Mesh::new(&init.device, "gasket", &vertices);
        let paint = UniformResources::new(
            &init.device,
            &init.layouts.paint,
            PaintUniform::from(config.paint),
            "gasket paint",
        );
        Ok(Self {
            config,
            mesh,
            paint,
        })
    }
}

impl GraphicsFlow<DemoState> for Gasket {
    fn on_init(&mut self, _: &mut Context, _: &mut DemoState) -> Out {
        settings(self.config.clear)
    }

    fn on_update(&mut self, _: &Context, state: &mut DemoState, _: Duration) -> Out {
        // static picture
        state.frames += 1;
        Out::Empty
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        report_frame_rate("gasket", ctx, state);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        let flat = Flat {
            mesh: &self.mesh,
            paint: &self.paint.bind_group,
        };
        match self.config.mode {
            GasketMode::ChaosGame { .. } => Render::Points(flat),
            GasketMode::Subdivision { .. } => Render::Triangles(flat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_override_switches_to_subdivision() {
        let config = GasketConfig::default().with_overrides(&Overrides {
            depth: Some(3),
            ..Default::default()
        });
        assert_eq!(config.mode, GasketMode::Subdivision { depth: 3 });
        assert_eq!(config.vertices().unwrap().len(), 3 * 27);
    }

    #[test]
    fn seeded_chaos_game_is_reproducible() {
        let config = GasketConfig::default().with_overrides(&Overrides {
            points: Some(500),
            seed: Some(9),
            ..Default::default()
        });
        let first = config.vertices().unwrap();
        assert_eq!(first.len(), 500);
        assert_eq!(first, config.vertices().unwrap());
    }

    #[test]
    fn too_deep_subdivision_is_an_error() {
        let config = GasketConfig {
            mode: GasketMode::Subdivision { depth: 40 },
            ..Default::default()
        };
        assert!(config.vertices().is_err());
    }
}
