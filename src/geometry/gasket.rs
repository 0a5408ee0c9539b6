//! Sierpinski gasket generators.
//!
//! Two classic ways to build the gasket from a seed triangle:
//!
//! - [`chaos_game`] repeatedly jumps half-way towards a random corner and
//!   produces a point cloud
//! - [`subdivide`] recursively splits the triangle and drops the middle piece,
//!   producing a triangle list

use anyhow::ensure;
use cgmath::{EuclideanSpace, Point2, Vector2};
use rand::Rng;

use crate::geometry::MAX_DEPTH;

/// Seed triangle of the gasket demo, spanning the whole clip-space viewport.
pub const DEFAULT_CORNERS: [[f32; 2]; 3] = [[-1.0, -1.0], [0.0, 1.0], [1.0, -1.0]];

pub const DEFAULT_POINTS: usize = 50_000;

/// Generates `count` points of the gasket using the chaos game.
///
/// The first point is `0.25 * ((c0 + c1) + (c0 + c2))`, which lies inside the
/// triangle. Every following point is the midpoint between its predecessor and
/// a corner picked uniformly at random.
pub fn chaos_game<R: Rng + ?Sized>(
    corners: [[f32; 2]; 3],
    count: usize,
    rng: &mut R,
) -> Vec<[f32; 2]> {
    let mut points = Vec::with_capacity(count);
    if count == 0 {
        return points;
    }
    let corners = corners.map(|c| Vector2::new(c[0], c[1]));
    let u = corners[0] + corners[1];
    let v = corners[0] + corners[2];
    let mut p = (u + v) * 0.25;
    points.push(p.into());

    while points.len() < count {
        let j = rng.gen_range(0..3);
        p = (p + corners[j]) * 0.5;
        points.push(p.into());
    }
    points
}

/// Recursively subdivides the seed triangle `depth` times.
///
/// Each level replaces a triangle by the three corner triangles spanned by its
/// edge midpoints, so the result has `3^depth` triangles (three vertices each).
/// Depths above [`MAX_DEPTH`] are rejected.
pub fn subdivide(corners: [[f32; 2]; 3], depth: u32) -> anyhow::Result<Vec<[f32; 2]>> {
    ensure!(
        depth <= MAX_DEPTH,
        "gasket subdivision depth must be at most {MAX_DEPTH}, got {depth}"
    );
    let mut vertices = Vec::with_capacity(3 * 3usize.pow(depth));
    let [a, b, c] = corners.map(|c| Point2::new(c[0], c[1]));
    divide_triangle(a, b, c, depth, &mut vertices);
    Ok(vertices)
}

fn divide_triangle(
    a: Point2<f32>,
    b: Point2<f32>,
    c: Point2<f32>,
    count: u32,
    out: &mut Vec<[f32; 2]>,
) {
    if count == 0 {
        out.extend::<[[f32; 2]; 3]>([a.into(), b.into(), c.into()]);
        return;
    }
    let ab = a.midpoint(b);
    let ac = a.midpoint(c);
    let bc = b.midpoint(c);

    divide_triangle(a, ab, ac, count - 1, out);
    divide_triangle(c, ac, bc, count - 1, out);
    divide_triangle(b, bc, ab, count - 1, out);
}

/// Returns `true` if `p` lies inside (or on the border of) the triangle.
///
/// Uses the signs of the three edge functions; `epsilon` absorbs float noise on
/// the edges.
pub fn in_triangle(p: [f32; 2], corners: [[f32; 2]; 3], epsilon: f32) -> bool {
    let edge = |a: [f32; 2], b: [f32; 2]| (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
    let d0 = edge(corners[0], corners[1]);
    let d1 = edge(corners[1], corners[2]);
    let d2 = edge(corners[2], corners[0]);
    let has_neg = d0 < -epsilon || d1 < -epsilon || d2 < -epsilon;
    let has_pos = d0 > epsilon || d1 > epsilon || d2 > epsilon;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn chaos_game_produces_requested_amount() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(chaos_game(DEFAULT_CORNERS, 5000, &mut rng).len(), 5000);
        assert_eq!(chaos_game(DEFAULT_CORNERS, 1, &mut rng).len(), 1);
        assert!(chaos_game(DEFAULT_CORNERS, 0, &mut rng).is_empty());
    }

    #[test]
    fn chaos_game_starts_inside_the_seed_triangle() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = chaos_game(DEFAULT_CORNERS, 1, &mut rng)[0];
        // 0.25 * ((-1,-1) + (0,1) + (-1,-1) + (1,-1))
        assert_relative_eq!(first[0], -0.25);
        assert_relative_eq!(first[1], -0.5);
    }

    #[test]
    fn chaos_game_stays_within_convex_hull() {
        let mut rng = StdRng::seed_from_u64(42);
        let points = chaos_game(DEFAULT_CORNERS, DEFAULT_POINTS, &mut rng);
        assert!(points.iter().all(|p| in_triangle(*p, DEFAULT_CORNERS, 1e-5)));
    }

    #[test]
    fn chaos_game_is_deterministic_for_a_seed() {
        let a = chaos_game(DEFAULT_CORNERS, 100, &mut StdRng::seed_from_u64(3));
        let b = chaos_game(DEFAULT_CORNERS, 100, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn subdivision_yields_three_to_the_depth_triangles() {
        for depth in 0..6 {
            let vertices = subdivide(DEFAULT_CORNERS, depth).unwrap();
            assert_eq!(vertices.len(), 3 * 3usize.pow(depth));
        }
    }

    #[test]
    fn subdivision_rejects_depths_beyond_the_limit() {
        assert!(subdivide(DEFAULT_CORNERS, MAX_DEPTH).is_ok());
        assert!(subdivide(DEFAULT_CORNERS, MAX_DEPTH + 1).is_err());
        assert!(subdivide(DEFAULT_CORNERS, u32::MAX).is_err());
    }

    #[test]
    fn subdivision_stays_within_convex_hull() {
        let vertices = subdivide(DEFAULT_CORNERS, 5).unwrap();
        assert!(vertices.iter().all(|p| in_triangle(*p, DEFAULT_CORNERS, 1e-6)));
    }

    #[test]
    fn subdivision_removes_the_middle_triangle() {
        let vertices = subdivide(DEFAULT_CORNERS, 1).unwrap();
        // centroid of the dropped middle triangle (midpoints of the seed edges)
        let centre = [0.0, -1.0 / 3.0];
        let covered = vertices.chunks(3).any(|t| in_triangle(centre, [t[0], t[1], t[2]], 0.0));
        assert!(!covered);
    }

    #[test]
    fn point_outside_is_rejected() {
        assert!(!in_triangle([0.9, 0.9], DEFAULT_CORNERS, 1e-6));
        assert!(in_triangle([0.0, 0.0], DEFAULT_CORNERS, 1e-6));
    }
}
