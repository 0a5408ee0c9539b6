//! Object transformations.
//!
//! A [`Transform`] places an object in the world: scale first, then rotate
//! (Euler angles in degrees), then translate. The demos animate these values
//! every frame and turn them into matrices right before drawing.

use cgmath::{Deg, Matrix3, Matrix4, SquareMatrix, Vector3};

/// Translation, rotation (degrees around x, y and z) and scale of an object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// `Rx * Rz * Ry`, i.e. y is applied first and x last.
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        Matrix3::from_angle_x(Deg(self.rotation.x))
            * Matrix3::from_angle_z(Deg(self.rotation.z))
            * Matrix3::from_angle_y(Deg(self.rotation.y))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation_matrix())
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse transpose of the upper 3x3 of [`to_matrix`](Self::to_matrix).
    ///
    /// For `R * S` this is `R * S^-1`. Axes with a zero scale are flattened and
    /// contribute nothing.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        let inv = |s: f32| if s == 0.0 { 0.0 } else { 1.0 / s };
        self.rotation_matrix()
            * Matrix3::from_diagonal(Vector3::new(
                inv(self.scale.x),
                inv(self.scale.y),
                inv(self.scale.z),
            ))
    }

    pub fn to_raw(&self) -> TransformRaw {
        TransformRaw {
            model: self.to_matrix().into(),
            normal: padded(self.normal_matrix()),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(translation: Vector3<f32>) -> Self {
        Transform {
            translation,
            ..Default::default()
        }
    }
}

/// Columns of `m` padded to `vec4`, as WGSL lays out a `mat3x3<f32>`.
pub fn padded(m: Matrix3<f32>) -> [[f32; 4]; 3] {
    [m.x.extend(0.0).into(), m.y.extend(0.0).into(), m.z.extend(0.0).into()]
}

/**
 * The raw transform is what the shaders see. WGSL pads every mat3x3 column to
 * 16 bytes, so the normal matrix is stored as three vec4 columns.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{InnerSpace, Matrix, Vector4};

    fn assert_close<const N: usize>(actual: [f32; N], expected: [f32; N]) {
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, e, epsilon = 1e-5);
        }
    }

    #[test]
    fn identity_leaves_points_untouched() {
        let p = Vector4::new(0.3, -0.2, 0.7, 1.0);
        assert_eq!(Transform::new().to_matrix() * p, p);
    }

    #[test]
    fn scale_rotate_translate_order() {
        let transform = Transform {
            translation: Vector3::new(1.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 90.0, 0.0),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        // (1,0,0) -> scaled (2,0,0) -> rotated about y (0,0,-2) -> moved (1,0,-2)
        let p = transform.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_close(p.into(), [1.0, 0.0, -2.0, 1.0]);
    }

    #[test]
    fn y_rotation_is_applied_before_x() {
        let transform = Transform::new().with_rotation(Vector3::new(90.0, 90.0, 0.0));
        // Ry maps +x to -z, then Rx maps -z to +y.
        let v = transform.rotation_matrix() * Vector3::new(1.0, 0.0, 0.0);
        assert_close(v.into(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let transform = Transform {
            translation: Vector3::new(3.0, -1.0, 2.0),
            rotation: Vector3::new(20.0, 45.0, -10.0),
            scale: Vector3::new(1.0, 2.0, 0.5),
        };
        let m = transform.to_matrix();
        let upper = Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate());
        let expected = upper.invert().map(|inv| inv.transpose()).unwrap();
        let actual: [[f32; 3]; 3] = transform.normal_matrix().into();
        let expected: [[f32; 3]; 3] = expected.into();
        for (a, e) in actual.into_iter().zip(expected) {
            assert_close(a, e);
        }
    }

    #[test]
    fn normals_stay_perpendicular_under_non_uniform_scale() {
        let transform = Transform {
            scale: Vector3::new(3.0, 1.0, 1.0),
            ..Default::default()
        };
        // A surface spanned by (1,1,0) and (0,0,1) has normal (1,-1,0).
        let tangent = (transform.to_matrix() * Vector4::new(1.0, 1.0, 0.0, 0.0)).truncate();
        let normal = transform.normal_matrix() * Vector3::new(1.0, -1.0, 0.0);
        assert_relative_eq!(tangent.dot(normal), 0.0, epsilon = 1e-6);
    }
}
