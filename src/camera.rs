//! Orbit camera, projections and the camera uniform.
//!
//! The camera sits on a sphere around a target point and always looks at it.
//! `theta` turns around the y axis (measured from `+z` towards `+x`), `phi`
//! lifts the camera above the xz plane. An extra free `translation` shifts eye
//! and target together.

use std::f32::consts::{FRAC_PI_2, TAU};

use cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::pipelines::basic::mk_uniform_layout;

/// cgmath produces OpenGL clip space (z in -1..1), wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    /// Radians.
    pub theta: f32,
    /// Radians.
    pub phi: f32,
    pub target: Point3<f32>,
    pub translation: Vector3<f32>,
    pub radius_range: (f32, f32),
}

impl OrbitCamera {
    pub fn new(radius: f32, theta: Deg<f32>, phi: Deg<f32>) -> Self {
        let mut camera = Self {
            radius,
            theta: theta.0.to_radians(),
            phi: phi.0.to_radians(),
            target: Point3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
            radius_range: (f32::EPSILON, f32::MAX),
        };
        camera.normalize();
        camera
    }

    pub fn with_radius_range(mut self, min: f32, max: f32) -> Self {
        self.radius_range = (min, max);
        self.normalize();
        self
    }

    /// Wraps `theta` into `[0, 2pi]`, clamps `phi` to `[-pi/2, pi/2]` and the
    /// radius to its configured range.
    pub fn normalize(&mut self) {
        if !(0.0..=TAU).contains(&self.theta) {
            self.theta = self.theta.rem_euclid(TAU);
        }
        self.phi = self.phi.clamp(-FRAC_PI_2, FRAC_PI_2);
        let (min, max) = self.radius_range;
        self.radius = self.radius.clamp(min, max);
    }

    /// Eye position relative to the target, before the free translation.
    pub fn orbit_offset(&self) -> Vector3<f32> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        self.radius * Vector3::new(sin_theta * cos_phi, sin_phi, cos_theta * cos_phi)
    }

    /// World position of the eye.
    pub fn position(&self) -> Point3<f32> {
        self.target + self.orbit_offset() + self.translation
    }

    /// View matrix without the free translation.
    pub fn look_at(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.target + self.orbit_offset(), self.target, Vector3::unit_y())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.look_at() * Matrix4::from_translation(-self.translation)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(3.0, Deg(0.0), Deg(0.0))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProjectionMode {
    /// 90 degree vertical field of view.
    Perspective,
    /// Window bounds divided by `ratio`.
    Orthographic { ratio: f32 },
}

/// Viewing volume given by window bounds and clip planes.
///
/// Orthographic projections keep everything between `-far` and `far` along
/// the view axis, so objects between the eye and the target are never clipped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Projection {
    pub const FOVY: Deg<f32> = Deg(90.0);

    pub fn new(
        [left, right, bottom, top]: [f32; 4],
        near: f32,
        far: f32,
        mode: ProjectionMode,
    ) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
            mode,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }

    /// Keeps the vertical extent and stretches the horizontal one to the
    /// surface aspect ratio. Zero sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let centre = (self.left + self.right) / 2.0;
        let half_width = (self.top - self.bottom) * width as f32 / height as f32 / 2.0;
        self.left = centre - half_width;
        self.right = centre + half_width;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * match self.mode {
                ProjectionMode::Perspective => {
                    cgmath::perspective(Self::FOVY, self.aspect(), self.near, self.far)
                }
                ProjectionMode::Orthographic { ratio } => cgmath::ortho(
                    self.left / ratio,
                    self.right / ratio,
                    self.bottom / ratio,
                    self.top / ratio,
                    -self.far,
                    self.far,
                ),
            }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &OrbitCamera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer plus its bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: OrbitCamera,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: OrbitCamera, projection: &Projection) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = mk_bind_group_layout(device);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Recomputes the uniform and uploads it.
    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.camera.normalize();
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(
        device,
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        "camera_bind_group_layout",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector4;

    fn clip(projection: &Projection, camera: &OrbitCamera, p: [f32; 3]) -> Vector4<f32> {
        let v = projection.calc_matrix() * camera.view_matrix() * Point3::from(p).to_homogeneous();
        v / v.w
    }

    #[test]
    fn eye_starts_on_positive_z() {
        let camera = OrbitCamera::new(3.0, Deg(0.0), Deg(0.0));
        let eye = camera.position();
        assert_relative_eq!(eye.x, 0.0);
        assert_relative_eq!(eye.y, 0.0);
        assert_relative_eq!(eye.z, 3.0);
    }

    #[test]
    fn theta_turns_towards_positive_x_and_phi_lifts() {
        let camera = OrbitCamera::new(2.0, Deg(90.0), Deg(0.0));
        assert_relative_eq!(camera.position().x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(camera.position().z, 0.0, epsilon = 1e-6);

        let camera = OrbitCamera::new(2.0, Deg(0.0), Deg(90.0));
        assert_relative_eq!(camera.position().y, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn normalize_wraps_theta_and_clamps_phi() {
        let mut camera = OrbitCamera::default();
        camera.theta = -FRAC_PI_2;
        camera.phi = 3.0;
        camera.normalize();
        assert_relative_eq!(camera.theta, 3.0 * FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(camera.phi, FRAC_PI_2);

        camera.theta = 5.0 * TAU + 1.0;
        camera.phi = -3.0;
        camera.normalize();
        assert_relative_eq!(camera.theta, 1.0, epsilon = 1e-4);
        assert_relative_eq!(camera.phi, -FRAC_PI_2);
    }

    #[test]
    fn radius_is_clamped_to_its_range() {
        let mut camera = OrbitCamera::new(10.0, Deg(0.0), Deg(0.0)).with_radius_range(1.0, 5.0);
        assert_eq!(camera.radius, 5.0);
        camera.radius = 0.0;
        camera.normalize();
        assert_eq!(camera.radius, 1.0);
    }

    #[test]
    fn target_lands_in_the_middle_of_the_screen() {
        let camera = OrbitCamera::new(3.0, Deg(30.0), Deg(20.0));
        let projection = Projection::new([-6.0, 6.0, -3.0, 3.0], 1.0, 6.0, ProjectionMode::Perspective);
        let centre = clip(&projection, &camera, [0.0, 0.0, 0.0]);
        assert_relative_eq!(centre.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(centre.y, 0.0, epsilon = 1e-5);
        assert!(centre.z > 0.0 && centre.z < 1.0);
    }

    #[test]
    fn perspective_depth_maps_near_and_far_to_wgpu_range() {
        let camera = OrbitCamera::new(3.0, Deg(0.0), Deg(0.0));
        let projection = Projection::new([-1.0, 1.0, -1.0, 1.0], 1.0, 6.0, ProjectionMode::Perspective);
        // eye at z = 3, near plane at z = 2, far plane at z = -3
        assert_relative_eq!(clip(&projection, &camera, [0.0, 0.0, 2.0]).z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip(&projection, &camera, [0.0, 0.0, -3.0]).z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn orthographic_keeps_points_behind_the_eye() {
        let camera = OrbitCamera::new(3.0, Deg(0.0), Deg(0.0));
        let projection = Projection::new(
            [-60.0, 60.0, -30.0, 30.0],
            0.5,
            300.0,
            ProjectionMode::Orthographic { ratio: 10.0 },
        );
        // x extent is 60 / 10 = 6 units
        let edge = clip(&projection, &camera, [6.0, 0.0, 0.0]);
        assert_relative_eq!(edge.x, 1.0, epsilon = 1e-5);
        let behind = clip(&projection, &camera, [0.0, 0.0, 5.0]);
        assert!(behind.z > 0.0 && behind.z < 1.0);
    }

    #[test]
    fn resize_keeps_vertical_extent() {
        let mut projection = Projection::new([-6.0, 6.0, -3.0, 3.0], 1.0, 6.0, ProjectionMode::Perspective);
        projection.resize(800, 800);
        assert_eq!((projection.left, projection.right), (-3.0, 3.0));
        assert_eq!((projection.bottom, projection.top), (-3.0, 3.0));
        assert_eq!(projection.aspect(), 1.0);
        projection.resize(0, 600);
        assert_eq!(projection.aspect(), 1.0);
    }

    #[test]
    fn translation_moves_eye_and_target_together() {
        let mut camera = OrbitCamera::new(3.0, Deg(0.0), Deg(0.0));
        let before = camera.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        camera.translation = Vector3::new(1.0, 0.0, 0.0);
        let after = camera.view_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(before.x, after.x, epsilon = 1e-6);
        assert_relative_eq!(before.z, after.z, epsilon = 1e-6);
        assert_relative_eq!(camera.position().x, 1.0, epsilon = 1e-6);
    }
}
