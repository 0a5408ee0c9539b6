//! A vertex coloured cube that spins, bounces and cycles through the hues.
//!
//! The cube is drawn straight into clip space, without camera or light. The
//! keys `x`, `y` and `z` hand the rotation to another axis.

use std::time::Duration;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::Key,
};

use crate::{
    animation::{Axis, ColorCycle, SpinState},
    context::{Context, InitContext},
    data_structures::model::Mesh,
    demos::{DemoState, report_frame_rate, settings},
    flow::{GraphicsFlow, Out},
    geometry::cube::colored_cube,
    pipelines::{basic::UniformResources, colored::ColoredUniform},
    render::{Colored, Render},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeConfig {
    pub clear: wgpu::Color,
    pub axis: Axis,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            clear: wgpu::Color::BLACK,
            axis: Axis::X,
        }
    }
}

pub struct SpinningCube {
    config: CubeConfig,
    mesh: Mesh,
    uniform: UniformResources<ColoredUniform>,
    spin: SpinState,
    colors: ColorCycle,
}

impl SpinningCube {
    pub fn new(init: &InitContext, config: CubeConfig) -> Self {
        let (vertices, indices) = colored_cube();
        let mesh = Mesh::indexed(&init.device, "colored cube", &vertices, &indices);
        let mut spin = SpinState::new();
        spin.select_axis(config.axis);
        let colors = ColorCycle::default();
        let uniform = UniformResources::new(
            &init.device,
            &init.layouts.colored,
            ColoredUniform::new(spin.model_matrix(), colors.hue_matrix()),
            "colored cube uniform",
        );
        Self {
            config,
            mesh,
            uniform,
            spin,
            colors,
        }
    }
}

fn axis_for_key(key: &str) -> Option<Axis> {
    match key {
        "x" | "X" => Some(Axis::X),
        "y" | "Y" => Some(Axis::Y),
        "z" | "Z" => Some(Axis::Z),
        _ => None,
    }
}

impl GraphicsFlow<DemoState> for SpinningCube {
    fn on_init(&mut self, _: &mut Context, _: &mut DemoState) -> Out {
        settings(self.config.clear)
    }

    fn on_update(&mut self, ctx: &Context, state: &mut DemoState, _: Duration) -> Out {
        state.frames += 1;
        self.spin.advance();
        self.colors.advance();
        self.uniform.write(
            &ctx.queue,
            ColoredUniform::new(self.spin.model_matrix(), self.colors.hue_matrix()),
        );
        Out::Empty
    }

    fn on_tick(&mut self, ctx: &Context, state: &mut DemoState) -> Out {
        log::debug!("cube rotating around {:?}", self.spin.axis);
        report_frame_rate("cube", ctx, state);
        Out::Empty
    }

    fn on_window_events(&mut self, _: &Context, _: &mut DemoState, event: &WindowEvent) -> Out {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key: Key::Character(key),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        {
            if let Some(axis) = axis_for_key(key.as_str()) {
                self.spin.select_axis(axis);
            }
        }
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::Colored(Colored {
            mesh: &self.mesh,
            group: &self.uniform.bind_group,
        })
    }
}
