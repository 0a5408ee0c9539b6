//! CPU-side geometry generators.
//!
//! Nothing in here touches the GPU: every function returns plain vertex data
//! that the demos upload through [`crate::data_structures::model::Mesh`].

/// Deepest recursive subdivision the generators accept. Depth 8 already
/// means half a million sphere triangles.
pub const MAX_DEPTH: u32 = 8;

pub mod cube;
pub mod gasket;
pub mod painter;
pub mod sphere;
