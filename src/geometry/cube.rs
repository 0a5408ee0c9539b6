//! Unit cube geometry (half-extent `0.11`) in the two flavours the demos need.

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::{ColorVertex, TexturedVertex};

pub const HALF_EXTENT: f32 = 0.11;

pub const CORNERS: [[f32; 4]; 8] = [
    [-HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT, 1.0],
    [-HALF_EXTENT, HALF_EXTENT, HALF_EXTENT, 1.0],
    [HALF_EXTENT, HALF_EXTENT, HALF_EXTENT, 1.0],
    [HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT, 1.0],
    [-HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT, 1.0],
    [-HALF_EXTENT, HALF_EXTENT, -HALF_EXTENT, 1.0],
    [HALF_EXTENT, HALF_EXTENT, -HALF_EXTENT, 1.0],
    [HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT, 1.0],
];

/// Corner colours: black, red, yellow, green, blue, magenta, cyan, white.
pub const CORNER_COLORS: [[f32; 4]; 8] = [
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
];

/// Quads as corner indices, counter-clockwise seen from outside.
pub const FACES: [[usize; 4]; 6] = [
    [1, 0, 3, 2],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [6, 5, 1, 2],
    [4, 5, 6, 7],
    [5, 4, 0, 1],
];

const FACE_TEX_CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

// a,b,c / a,c,d
const QUAD_SPLIT: [usize; 6] = [0, 1, 2, 0, 2, 3];

pub const NUM_ELEMENTS: usize = 36;

/// Eight coloured corners plus the 36 indices of the twelve triangles.
pub fn colored_cube() -> (Vec<ColorVertex>, Vec<u16>) {
    let vertices = CORNERS
        .iter()
        .zip(CORNER_COLORS.iter())
        .map(|(&position, &color)| ColorVertex { position, color })
        .collect();
    let indices = FACES
        .iter()
        .flat_map(|face| QUAD_SPLIT.iter().map(move |&i| face[i] as u16))
        .collect();
    (vertices, indices)
}

/// Outward unit normal of a face, computed from its first three corners.
pub fn face_normal(face: [usize; 4]) -> Vector3<f32> {
    let corner = |i: usize| Vector3::new(CORNERS[i][0], CORNERS[i][1], CORNERS[i][2]);
    let edge1 = corner(face[1]) - corner(face[0]);
    let edge2 = corner(face[2]) - corner(face[0]);
    edge1.cross(edge2).normalize()
}

/// 36 non-indexed vertices with per-face texture corners and flat normals.
pub fn textured_cube() -> Vec<TexturedVertex> {
    FACES
        .iter()
        .flat_map(|&face| {
            let normal: [f32; 3] = face_normal(face).into();
            QUAD_SPLIT.iter().map(move |&i| TexturedVertex {
                position: CORNERS[face[i]],
                tex_coords: FACE_TEX_CORNERS[i],
                normal,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn colored_cube_matches_element_order() {
        let (vertices, indices) = colored_cube();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), NUM_ELEMENTS);
        assert_eq!(&indices[..12], &[1, 0, 3, 1, 3, 2, 2, 3, 7, 2, 7, 6]);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn textured_cube_has_36_vertices() {
        let vertices = textured_cube();
        assert_eq!(vertices.len(), NUM_ELEMENTS);
        assert_eq!(vertices.len() % 3, 0);
    }

    #[test]
    fn face_normals_point_outward() {
        for face in FACES {
            let normal = face_normal(face);
            let centre = face
                .iter()
                .map(|&i| Vector3::new(CORNERS[i][0], CORNERS[i][1], CORNERS[i][2]))
                .fold(Vector3::new(0.0, 0.0, 0.0), |acc, c| acc + c)
                / 4.0;
            assert!(normal.dot(centre) > 0.0, "face {:?} faces inward", face);
            assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for tri in textured_cube().chunks(3) {
            let p = |v: &TexturedVertex| Vector3::new(v.position[0], v.position[1], v.position[2]);
            let winding = (p(&tri[1]) - p(&tri[0])).cross(p(&tri[2]) - p(&tri[0]));
            let normal = Vector3::from(tri[0].normal);
            assert!(winding.dot(normal) > 0.0);
        }
    }

    #[test]
    fn texture_corners_cover_the_unit_square() {
        let vertices = textured_cube();
        let face = &vertices[..6];
        let uvs: Vec<_> = face.iter().map(|v| v.tex_coords).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 0.0]]);
    }
}
