//! gasket-demos
//!
//! Small interactive graphics demos built on wgpu and winit that run natively
//! and in the browser (WebGL2). Each demo is a single flow driving one window:
//! the Sierpinski gasket, a spinning colour cycling cube, textured cubes and
//! planets, an earth with its moon and a scene of 27 cubes that is depth
//! sorted with the painter's algorithm and supports picking by mouse click.
//!
//! High-level modules
//! - `geometry`: CPU-side generators (gasket, cube, sphere) and the painter's sort
//! - `animation`: per-frame animation state of the demos
//! - `camera`: orbit camera, projections and the camera uniform
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: vertices, meshes, materials, transforms and textures
//! - `pipelines`: one render pipeline per kind of geometry
//! - `render`: render composition and batching per pipeline
//! - `pick`: object picking through an offscreen id texture
//! - `resources`: procedural textures and GPU upload helpers
//! - `flow`: the flow trait and the event loop
//! - `demos`: the demos and their configuration
//!

pub mod animation;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod demos;
pub mod flow;
pub mod geometry;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Runs the demo called `name` with its default configuration.
///
/// This is the entry point of the web build; the page passes the demo name.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start(name: &str) -> Result<(), JsValue> {
    flow::init_logger();
    let run = || -> anyhow::Result<()> {
        let demo = demos::Demo::from_name(name)?;
        let constructor = demos::constructor(demo, &demos::Overrides::default())?;
        flow::run(vec![constructor])
    };
    run().map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
