//! Geodesic sphere built by recursive subdivision of an octahedron.
//!
//! Every level bisects the three edges of each triangle, pushes the midpoints
//! back onto the unit sphere and replaces the triangle by four smaller ones.
//! Starting from the eight faces of the octahedron, `depth` levels produce
//! exactly `8 * 4^depth` triangles.

use std::f32::consts::PI;

use anyhow::{Context, ensure};
use cgmath::{InnerSpace, Vector3, Vector4, VectorSpace};

use crate::{data_structures::model::TexturedVertex, geometry::MAX_DEPTH};

/// Triangles whose u-range exceeds this straddle the texture seam.
pub const SEAM_THRESHOLD: f32 = 0.85;

const TOP: Vector4<f32> = Vector4 { x: 0.0, y: 1.0, z: 0.0, w: 1.0 };
const FRONT: Vector4<f32> = Vector4 { x: 0.0, y: 0.0, z: 1.0, w: 1.0 };
const RIGHT: Vector4<f32> = Vector4 { x: 1.0, y: 0.0, z: 0.0, w: 1.0 };
const BACK: Vector4<f32> = Vector4 { x: 0.0, y: 0.0, z: -1.0, w: 1.0 };
const LEFT: Vector4<f32> = Vector4 { x: -1.0, y: 0.0, z: 0.0, w: 1.0 };
const BOTTOM: Vector4<f32> = Vector4 { x: 0.0, y: -1.0, z: 0.0, w: 1.0 };

pub type Triangle = [Vector4<f32>; 3];

/// Number of triangles [`subdivide_octahedron`] yields for `depth`, `None`
/// if that does not fit a `usize`.
pub fn triangle_count(depth: u32) -> Option<usize> {
    4usize.checked_pow(depth)?.checked_mul(8)
}

/// Subdivides the unit octahedron `depth` times.
///
/// Triangles are wound counter-clockwise when seen from outside the sphere.
/// Depths above [`MAX_DEPTH`] are rejected.
pub fn subdivide_octahedron(depth: u32) -> anyhow::Result<Vec<Triangle>> {
    ensure!(
        depth <= MAX_DEPTH,
        "sphere subdivision depth must be at most {MAX_DEPTH}, got {depth}"
    );
    let count = triangle_count(depth).context("sphere has too many triangles")?;
    let mut triangles = Vec::with_capacity(count);
    let (a, b, c, d, e, f) = (TOP, FRONT, RIGHT, BACK, LEFT, BOTTOM);

    divide_triangle(a, b, c, depth, &mut triangles);
    divide_triangle(a, c, d, depth, &mut triangles);
    divide_triangle(a, d, e, depth, &mut triangles);
    divide_triangle(a, e, b, depth, &mut triangles);

    divide_triangle(f, c, b, depth, &mut triangles);
    divide_triangle(f, d, c, depth, &mut triangles);
    divide_triangle(f, e, d, depth, &mut triangles);
    divide_triangle(f, b, e, depth, &mut triangles);

    Ok(triangles)
}

fn divide_triangle(
    a: Vector4<f32>,
    b: Vector4<f32>,
    c: Vector4<f32>,
    count: u32,
    out: &mut Vec<Triangle>,
) {
    if count == 0 {
        out.push([a, b, c]);
        return;
    }
    let ab = on_sphere(a.lerp(b, 0.5));
    let ac = on_sphere(a.lerp(c, 0.5));
    let bc = on_sphere(b.lerp(c, 0.5));

    divide_triangle(a, ab, ac, count - 1, out);
    divide_triangle(ab, b, bc, count - 1, out);
    divide_triangle(bc, c, ac, count - 1, out);
    divide_triangle(ab, bc, ac, count - 1, out);
}

/// Normalises the xyz part and keeps `w = 1`.
fn on_sphere(v: Vector4<f32>) -> Vector4<f32> {
    v.truncate().normalize().extend(1.0)
}

/// Equirectangular texture coordinates for the three corners of a triangle.
///
/// `u = 0.5 + atan2(x, z) / 2pi` and `v = 0.5 - asin(y) / pi`. Corners on the
/// `x = 0, z < 0` meridian map to `u = 1`; when a triangle spans more than
/// [`SEAM_THRESHOLD`] of the texture width its largest `u` values are wrapped
/// to `0` so the triangle samples the left edge instead of smearing across the
/// whole image.
pub fn sphere_tex_coords(triangle: &Triangle) -> [[f32; 2]; 3] {
    let mut u = triangle.map(|p| 0.5 + p.x.atan2(p.z) / (2.0 * PI));
    let v = triangle.map(|p| 0.5 - p.y.clamp(-1.0, 1.0).asin() / PI);

    let max_u = u.iter().copied().fold(f32::MIN, f32::max);
    let min_u = u.iter().copied().fold(f32::MAX, f32::min);
    if max_u - min_u > SEAM_THRESHOLD {
        u.iter_mut().filter(|u| **u == max_u).for_each(|u| *u = 0.0);
    }

    [[u[0], v[0]], [u[1], v[1]], [u[2], v[2]]]
}

/// Interleaved sphere mesh: positions on the unit sphere, normals equal to the
/// positions and seam-corrected texture coordinates.
pub fn uv_sphere_mesh(depth: u32) -> anyhow::Result<Vec<TexturedVertex>> {
    let mesh = subdivide_octahedron(depth)?
        .iter()
        .flat_map(|triangle| {
            let tex_coords = sphere_tex_coords(triangle);
            (0..3).map(move |i| {
                let position = triangle[i];
                let normal: Vector3<f32> = position.truncate();
                TexturedVertex {
                    position: position.into(),
                    tex_coords: tex_coords[i],
                    normal: normal.into(),
                }
            })
        })
        .collect();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn octahedron_yields_eight_times_four_to_the_depth() {
        for depth in 0..6 {
            assert_eq!(
                Some(subdivide_octahedron(depth).unwrap().len()),
                triangle_count(depth)
            );
        }
        assert_eq!(triangle_count(4), Some(2048));
    }

    #[test]
    fn deep_spheres_are_rejected_instead_of_overflowing() {
        assert_eq!(triangle_count(40), None);
        assert!(subdivide_octahedron(MAX_DEPTH + 1).is_err());
        assert!(uv_sphere_mesh(u32::MAX).is_err());
    }

    #[test]
    fn vertices_lie_on_the_unit_sphere() {
        for triangle in subdivide_octahedron(4).unwrap() {
            for vertex in triangle {
                assert_relative_eq!(vertex.truncate().magnitude(), 1.0, epsilon = 1e-5);
                assert_eq!(vertex.w, 1.0);
            }
        }
    }

    #[test]
    fn triangles_wind_outward() {
        for [a, b, c] in subdivide_octahedron(3).unwrap() {
            let (a, b, c) = (a.truncate(), b.truncate(), c.truncate());
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn mesh_normals_match_positions() {
        let mesh = uv_sphere_mesh(2).unwrap();
        assert_eq!(Some(mesh.len()), triangle_count(2).map(|n| 3 * n));
        for vertex in mesh {
            assert_eq!(&vertex.position[..3], &vertex.normal[..]);
        }
    }

    #[test]
    fn tex_coords_stay_in_unit_square() {
        for triangle in subdivide_octahedron(4).unwrap() {
            for [u, v] in sphere_tex_coords(&triangle) {
                assert!((0.0..=1.0).contains(&u), "u = {u}");
                assert!((0.0..=1.0).contains(&v), "v = {v}");
            }
        }
    }

    #[test]
    fn poles_map_to_texture_edges() {
        let [[_, v_top], [_, v_front], [_, _]] = sphere_tex_coords(&[TOP, FRONT, RIGHT]);
        assert_relative_eq!(v_top, 0.0);
        assert_relative_eq!(v_front, 0.5);
    }

    #[test]
    fn seam_triangles_are_wrapped_to_the_left_edge() {
        // Straddles the back meridian: the back point maps to u = 1.0 while its
        // neighbours just left of the meridian map to u close to 0.0.
        let above = on_sphere(Vector4 { x: -0.1, y: 0.2, z: -1.0, w: 1.0 });
        let below = on_sphere(Vector4 { x: -0.1, y: -0.2, z: -1.0, w: 1.0 });
        let uv = sphere_tex_coords(&[above, BACK, below]);
        let us = uv.map(|c| c[0]);
        let spread = us.iter().copied().fold(f32::MIN, f32::max) - us.iter().copied().fold(f32::MAX, f32::min);
        assert!(spread <= SEAM_THRESHOLD);
        assert_relative_eq!(uv[1][0], 0.0);
        assert!(uv[0][0] < 0.05);
    }

    #[test]
    fn ordinary_triangles_are_left_alone() {
        let uv = sphere_tex_coords(&[TOP, FRONT, RIGHT]);
        assert_relative_eq!(uv[1][0], 0.5);
        assert_relative_eq!(uv[2][0], 0.75);
    }
}
