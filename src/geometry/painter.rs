//! Painter's algorithm for the hidden-surface-removal scene.
//!
//! Instead of a depth buffer the scene is drawn as one flat triangle list that
//! is re-sorted every frame: farthest triangles first, so nearer ones simply
//! paint over them. Each triangle keeps a reference to its object's transform,
//! material, texture layer and pick id so the sorted list can be uploaded as a
//! single vertex buffer.

use std::cmp::Ordering;

use cgmath::{Matrix4, Vector3, Vector4};

use crate::data_structures::{
    model::{Material, TexturedVertex},
    transform::Transform,
};

/// One triangle of a scene object, in object space.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTriangle {
    pub vertices: [Vector4<f32>; 3],
    pub tex_coords: [[f32; 2]; 3],
    pub normals: [Vector3<f32>; 3],
    pub transform: Transform,
    pub material: Material,
    pub texture_layer: u32,
    pub object_id: u32,
    /// Mean eye-space z, refreshed by [`update_depths`].
    pub depth: f32,
}

impl SceneTriangle {
    /// Splits a non-indexed triangle list into scene triangles sharing one
    /// transform, material, texture layer and id. A trailing partial triangle
    /// is ignored.
    pub fn from_mesh(
        vertices: &[TexturedVertex],
        transform: Transform,
        material: Material,
        texture_layer: u32,
        object_id: u32,
    ) -> Vec<Self> {
        vertices
            .chunks_exact(3)
            .map(|tri| Self {
                vertices: [0, 1, 2].map(|i| Vector4::from(tri[i].position)),
                tex_coords: [0, 1, 2].map(|i| tri[i].tex_coords),
                normals: [0, 1, 2].map(|i| Vector3::from(tri[i].normal)),
                transform,
                material,
                texture_layer,
                object_id,
                depth: 0.0,
            })
            .collect()
    }

    /// Mean eye-space z of the three vertices.
    ///
    /// Every vertex goes through `view * translation(-camera_offset) * model`.
    /// With a right-handed view looking down `-z` more negative means farther
    /// away.
    pub fn view_depth(&self, view: &Matrix4<f32>, camera_offset: Vector3<f32>) -> f32 {
        let model_view = view * Matrix4::from_translation(-camera_offset) * self.transform.to_matrix();
        let sum: f32 = self.vertices.iter().map(|v| (model_view * *v).z).sum();
        sum / self.vertices.len() as f32
    }
}

/// Recomputes [`SceneTriangle::depth`] for every triangle.
pub fn update_depths(triangles: &mut [SceneTriangle], view: &Matrix4<f32>, camera_offset: Vector3<f32>) {
    for triangle in triangles.iter_mut() {
        triangle.depth = triangle.view_depth(view, camera_offset);
    }
}

/// Stable ascending sort on depth, i.e. back to front.
///
/// NaN depths (degenerate transforms) end up last instead of panicking.
pub fn sort_back_to_front(triangles: &mut [SceneTriangle]) {
    triangles.sort_by(|a, b| compare_depth(a.depth, b.depth));
}

fn compare_depth(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

/// World-space vertex of the sorted scene.
///
/// Material products are already multiplied with the light colour so the
/// whole scene can be drawn with a single call.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PainterVertex {
    pub position: [f32; 4],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub texture_layer: u32,
    pub pick_id: u32,
}

/// Transforms the (sorted) triangles into world space, keeping their order.
pub fn flatten(triangles: &[SceneTriangle], light_color: [f32; 3]) -> Vec<PainterVertex> {
    let mut out = Vec::with_capacity(3 * triangles.len());
    for triangle in triangles {
        let model = triangle.transform.to_matrix();
        let normal_matrix = triangle.transform.normal_matrix();
        let products = triangle.material.products(light_color);
        for i in 0..3 {
            out.push(PainterVertex {
                position: (model * triangle.vertices[i]).into(),
                tex_coords: triangle.tex_coords[i],
                normal: (normal_matrix * triangle.normals[i]).into(),
                ambient: products.ambient,
                diffuse: products.diffuse,
                specular: products.specular,
                shininess: products.shininess,
                texture_layer: triangle.texture_layer,
                pick_id: triangle.object_id,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cube::textured_cube;
    use approx::assert_relative_eq;
    use cgmath::{Point3, SquareMatrix};

    fn triangle_at(z: f32, id: u32) -> SceneTriangle {
        let vertices = [[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]].map(|position| {
            TexturedVertex {
                position,
                tex_coords: [0.0, 0.0],
                normal: [0.0, 0.0, 1.0],
            }
        });
        let transform = Transform::from(Vector3::new(0.0, 0.0, z));
        SceneTriangle::from_mesh(&vertices, transform, Material::default(), 0, id).remove(0)
    }

    #[test]
    fn depth_is_the_mean_eye_space_z() {
        let triangle = triangle_at(-2.0, 1);
        let depth = triangle.view_depth(&Matrix4::identity(), Vector3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(depth, -2.0);
    }

    #[test]
    fn camera_offset_moves_the_scene_the_other_way() {
        let triangle = triangle_at(-2.0, 1);
        let depth = triangle.view_depth(&Matrix4::identity(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(depth, -3.0);
    }

    #[test]
    fn view_matrix_is_applied_last() {
        let triangle = triangle_at(0.0, 1);
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        assert_relative_eq!(triangle.view_depth(&view, Vector3::new(0.0, 0.0, 0.0)), -5.0, epsilon = 1e-6);
    }

    #[test]
    fn sorting_puts_the_farthest_triangle_first() {
        let mut triangles = vec![triangle_at(-1.0, 1), triangle_at(-3.0, 2), triangle_at(-2.0, 3)];
        update_depths(&mut triangles, &Matrix4::identity(), Vector3::new(0.0, 0.0, 0.0));
        sort_back_to_front(&mut triangles);
        let ids: Vec<_> = triangles.iter().map(|t| t.object_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(triangles.windows(2).all(|w| w[0].depth <= w[1].depth));
    }

    #[test]
    fn sorting_is_stable_for_equal_depths() {
        let mut triangles: Vec<_> = (1..=5).map(|id| triangle_at(-1.0, id)).collect();
        update_depths(&mut triangles, &Matrix4::identity(), Vector3::new(0.0, 0.0, 0.0));
        sort_back_to_front(&mut triangles);
        let ids: Vec<_> = triangles.iter().map(|t| t.object_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn nan_depths_sort_last_without_panicking() {
        let mut triangles = vec![triangle_at(0.0, 1), triangle_at(0.0, 2), triangle_at(0.0, 3)];
        triangles[0].depth = f32::NAN;
        triangles[1].depth = 4.0;
        triangles[2].depth = -4.0;
        sort_back_to_front(&mut triangles);
        let ids: Vec<_> = triangles.iter().map(|t| t.object_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn flatten_keeps_order_and_moves_to_world_space() {
        let mut triangles = vec![triangle_at(-1.0, 7), triangle_at(-3.0, 9)];
        triangles[1].texture_layer = 4;
        let vertices = flatten(&triangles, [1.0, 1.0, 1.0]);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].pick_id, 7);
        assert_eq!(vertices[3].pick_id, 9);
        assert_eq!(vertices[3].texture_layer, 4);
        assert_eq!(vertices[3].position, [0.0, 0.0, -3.0, 1.0]);
        assert_eq!(vertices[0].ambient, Material::default().ambient);
    }

    #[test]
    fn cube_splits_into_twelve_triangles() {
        let cube = SceneTriangle::from_mesh(&textured_cube(), Transform::new(), Material::default(), 2, 5);
        assert_eq!(cube.len(), 12);
        assert!(cube.iter().all(|t| t.object_id == 5 && t.texture_layer == 2));
    }
}
