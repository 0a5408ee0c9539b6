//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which demos return from
//! [`crate::flow::GraphicsFlow::on_render`] to describe what should be drawn.
//! The engine sorts the returned objects into one batch per pipeline and draws
//! the batches in a fixed order: 2D points and triangles, vertex coloured
//! objects, lit objects and finally the painter's scene.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Flat<'a>`] is a 2D mesh drawn in a single colour
//! - [`Colored<'a>`] is a vertex coloured mesh with its own transform
//! - [`Lit<'a>`] is a textured, lit mesh
//! - [`Painter<'a>`] is a depth sorted triangle list; the only pickable kind
//!

use std::collections::{HashMap, HashSet};

use wgpu::RenderPass;

use crate::{
    context::Context,
    data_structures::model::{DrawMesh, Mesh},
};

/// A 2D mesh and the bind group holding its paint colour.
pub struct Flat<'a> {
    pub mesh: &'a Mesh,
    pub paint: &'a wgpu::BindGroup,
}

/// A vertex coloured mesh and the bind group holding its transform and hue.
pub struct Colored<'a> {
    pub mesh: &'a Mesh,
    pub group: &'a wgpu::BindGroup,
}

/// A textured mesh lit by the context light.
///
/// `culled` selects between back face culling and drawing both sides, which
/// is what the inside of a star sphere needs.
pub struct Lit<'a> {
    pub mesh: &'a Mesh,
    pub texture: &'a wgpu::BindGroup,
    pub object: &'a wgpu::BindGroup,
    pub culled: bool,
}

/// A world space triangle list, already sorted back to front.
///
/// `ids` lists the pick ids that appear in `vertex`, so that clicks can be
/// routed to the flow that owns them.
pub struct Painter<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub amount: u32,
    pub texture: &'a wgpu::BindGroup,
    pub ids: &'a [u32],
}

/// Specifies how a demo should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Points(Flat)` renders a point list
/// - `Triangles(Flat)` renders a flat triangle list
/// - `Colored(Colored)` renders a vertex coloured object
/// - `Lit(Lit)` / `Lits(Vec<Lit>)` render textured, lit objects
/// - `Painter(Painter)` renders a pre-sorted scene without depth buffer
///
pub enum Render<'a> {
    None,
    Points(Flat<'a>),
    Triangles(Flat<'a>),
    Colored(Colored<'a>),
    Lit(Lit<'a>),
    Lits(Vec<Lit<'a>>),
    Painter(Painter<'a>),
}

/// Objects collected from all flows, grouped by pipeline.
#[derive(Default)]
pub(crate) struct Batches<'a> {
    pub points: Vec<Flat<'a>>,
    pub triangles: Vec<Flat<'a>>,
    pub colored: Vec<Colored<'a>>,
    pub lit: Vec<Lit<'a>>,
    pub lit_unculled: Vec<Lit<'a>>,
    pub painter: Vec<Painter<'a>>,
}

impl<'a> Batches<'a> {
    fn push_lit(&mut self, lit: Lit<'a>) {
        if lit.culled {
            self.lit.push(lit);
        } else {
            self.lit_unculled.push(lit);
        }
    }

    pub(crate) fn draw(self, ctx: &Context, render_pass: &mut RenderPass<'_>) {
        if !self.points.is_empty() {
            render_pass.set_pipeline(&ctx.pipelines.points);
            for flat in self.points {
                render_pass.set_bind_group(0, flat.paint, &[]);
                render_pass.draw_mesh(flat.mesh);
            }
        }

        if !self.triangles.is_empty() {
            render_pass.set_pipeline(&ctx.pipelines.flat);
            for flat in self.triangles {
                render_pass.set_bind_group(0, flat.paint, &[]);
                render_pass.draw_mesh(flat.mesh);
            }
        }

        if !self.colored.is_empty() {
            render_pass.set_pipeline(&ctx.pipelines.colored);
            for colored in self.colored {
                render_pass.set_bind_group(0, colored.group, &[]);
                render_pass.draw_mesh(colored.mesh);
            }
        }

        for (pipeline, batch) in [
            (&ctx.pipelines.lit, self.lit),
            (&ctx.pipelines.lit_unculled, self.lit_unculled),
        ] {
            if batch.is_empty() {
                continue;
            }
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, ctx.light.bind_group(), &[]);
            for lit in batch {
                render_pass.set_bind_group(0, lit.texture, &[]);
                render_pass.set_bind_group(3, lit.object, &[]);
                render_pass.draw_mesh(lit.mesh);
            }
        }

        if !self.painter.is_empty() {
            render_pass.set_pipeline(&ctx.pipelines.painter);
            render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, ctx.light.bind_group(), &[]);
            for painter in self.painter {
                if painter.amount == 0 {
                    log::warn!("you attemted to render a painter scene without triangles");
                    continue;
                }
                render_pass.set_bind_group(0, painter.texture, &[]);
                render_pass.set_vertex_buffer(0, painter.vertex.slice(..));
                render_pass.draw(0..painter.amount, 0..1);
            }
        }
    }
}

impl<'a> Render<'a> {
    /// Map object IDs to flow IDs for picking and selection.
    ///
    /// Records, for each pick id of a painter's scene, which flows rendered it.
    pub(crate) fn map_ids(&self, flow_id: usize, map: &mut HashMap<u32, HashSet<usize>>) {
        if let Render::Painter(painter) = self {
            painter.ids.iter().for_each(|id| {
                map.entry(*id).or_default().insert(flow_id);
            });
        }
    }

    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Points(flat) => batches.points.push(flat),
            Render::Triangles(flat) => batches.triangles.push(flat),
            Render::Colored(colored) => batches.colored.push(colored),
            Render::Lit(lit) => batches.push_lit(lit),
            Render::Lits(vec) => vec.into_iter().for_each(|lit| batches.push_lit(lit)),
            Render::Painter(painter) => batches.painter.push(painter),
            Render::None => (),
        }
    }

    /// Collects the pickable parts of the render.
    pub(crate) fn set_pick_pipelines(self, painters: &mut Vec<Painter<'a>>) {
        // Only the painter's scene carries pick ids
        if let Render::Painter(painter) = self {
            painters.push(painter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_a_painter_map_no_ids() {
        let mut map = HashMap::new();
        for render in [Render::None, Render::Lits(vec![])] {
            render.map_ids(0, &mut map);
        }
        assert!(map.is_empty());
    }

    #[test]
    fn renders_without_a_painter_are_not_pickable() {
        let mut painters = Vec::new();
        Render::None.set_pick_pipelines(&mut painters);
        Render::Lits(vec![]).set_pick_pipelines(&mut painters);
        assert!(painters.is_empty());
    }

    #[test]
    fn empty_renders_add_nothing_to_the_batches() {
        let mut batches = Batches::default();
        Render::None.set_pipelines(&mut batches);
        Render::Lits(vec![]).set_pipelines(&mut batches);
        assert!(batches.lit.is_empty() && batches.lit_unculled.is_empty());
        assert!(batches.points.is_empty() && batches.painter.is_empty());
    }
}
