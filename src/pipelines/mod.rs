//! Render pipelines, one per kind of geometry the demos draw.
//!
//! - `basic` holds the shared pipeline builder and uniform helpers
//! - `points` draws 2D points or triangles in a flat colour
//! - `colored` draws vertex-coloured geometry in clip space
//! - `lit` draws textured Blinn-Phong objects with a camera and a light
//! - `painter` draws the depth-sorted scene without a depth test
//! - `pick` renders the sorted scene's object ids for picking
//! - `light` holds the scene light uniform

pub mod basic;
pub mod colored;
pub mod light;
pub mod lit;
pub mod painter;
pub mod pick;
pub mod points;
