//! Scene data shared by all demos.
//!
//! - `model` contains vertex records, GPU meshes and Phong materials
//! - `texture` contains the GPU texture wrapper and its bind group layouts
//! - `transform` holds per-object translation/rotation/scale and their matrices

pub mod model;
pub mod texture;
pub mod transform;
