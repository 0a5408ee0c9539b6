//! Per-frame animation state.
//!
//! The demos advance their animations once per rendered frame, not per
//! wall-clock second, so the constants below are "units per frame".

use std::f32::consts::PI;

use cgmath::{Matrix3, Matrix4, Rad, Vector3};

use crate::data_structures::transform::Transform;

/// Degrees added to the active rotation axis every frame.
pub const SPIN_DEGREES_PER_FRAME: f32 = 1.5;
pub const TRANSLATE_VELOCITY: [f32; 2] = [0.00354, 0.00157];
pub const TRANSLATE_BOUNDARY: f32 = 0.8;
pub const SCALE_VELOCITY: f32 = 0.001;
pub const SCALE_RANGE: (f32, f32) = (0.25, 1.75);

/// Rotation axis of the spinning cube.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

/// Spinning, bouncing and pulsing cube.
///
/// Rotation accumulates on one axis at a time. The cube drifts on x and y and
/// bounces off `+-0.8`; every bounce hands the rotation over to the next
/// axis. The uniform scale breathes between `0.25` and `1.75`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinState {
    pub axis: Axis,
    pub theta: [f32; 3],
    pub translate: [f32; 2],
    translate_positive: [bool; 2],
    pub scale: [f32; 3],
    scale_positive: bool,
}

impl SpinState {
    pub fn new() -> Self {
        Self {
            axis: Axis::X,
            theta: [0.0; 3],
            translate: [0.0; 2],
            translate_positive: [true; 2],
            scale: [1.0; 3],
            scale_positive: true,
        }
    }

    /// Makes `axis` the active rotation axis. The accumulated angles stay.
    pub fn select_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn advance(&mut self) {
        self.theta[self.axis.index()] += SPIN_DEGREES_PER_FRAME;
        self.update_translation(0);
        self.update_translation(1);
        self.update_scaling();
    }

    fn update_translation(&mut self, i: usize) {
        if self.translate[i].abs() >= TRANSLATE_BOUNDARY {
            self.translate_positive[i] = !self.translate_positive[i];
            self.axis = self.axis.next();
        }
        if self.translate_positive[i] {
            self.translate[i] += TRANSLATE_VELOCITY[i];
        } else {
            self.translate[i] -= TRANSLATE_VELOCITY[i];
        }
    }

    fn update_scaling(&mut self) {
        let (min, max) = SCALE_RANGE;
        if self.scale[0] >= max || self.scale[0] <= min {
            self.scale_positive = !self.scale_positive;
        }
        let delta = if self.scale_positive {
            SCALE_VELOCITY
        } else {
            -SCALE_VELOCITY
        };
        self.scale.iter_mut().for_each(|s| *s += delta);
    }

    /// The current pose as a [`Transform`] in the xy plane.
    pub fn transform(&self) -> Transform {
        let [tx, ty] = self.translate;
        Transform {
            translation: Vector3::new(tx, ty, 0.0),
            rotation: self.theta.into(),
            scale: self.scale.into(),
        }
    }

    /// `T(translate) * Rx * Rz * Ry * S`, the same order every [`Transform`] uses.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform().to_matrix()
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new()
    }
}

/// Hue angle that walks once around the colour circle every 1000 frames.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ColorCycle {
    pub theta: f32,
}

impl ColorCycle {
    pub const STEP: f32 = 2.0 * PI / 1000.0;

    pub fn advance(&mut self) {
        self.theta = (self.theta + Self::STEP) % (2.0 * PI);
    }

    pub fn angle(&self) -> Rad<f32> {
        Rad(self.theta)
    }

    /// Rotation of RGB space about the grey axis by the current angle.
    ///
    /// Greys stay untouched while saturated colours walk around the hue circle:
    /// a third of a turn maps red to green.
    pub fn hue_matrix(&self) -> Matrix3<f32> {
        let k = 1.0 / 3.0_f32.sqrt();
        Matrix3::from_axis_angle(Vector3::new(k, k, k), self.angle())
    }
}

pub const MOON_ORBIT_RADIUS: f32 = 5.0;
/// Earth days per lunar orbit (sidereal month).
pub const EARTH_MOON_RATIO: f32 = 27.323;
pub const EARTH_DEGREES_PER_FRAME: f32 = 0.25;
pub const EARTH_AXIAL_TILT: f32 = 23.5;
pub const MOON_AXIAL_TILT: f32 = 6.688;
pub const MOON_SCALE: f32 = 0.25;

/// Earth spinning in place with a tidally locked moon orbiting it.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitState {
    pub earth: Transform,
    pub moon: Transform,
    /// Moon orbit angle in degrees.
    pub moon_theta: f32,
    pub time_scale: f32,
}

impl OrbitState {
    pub fn new(time_scale: f32) -> Self {
        let revolution_angle = 3.0 * PI / 4.0;
        let earth = Transform::new().with_rotation(Vector3::new(
            -EARTH_AXIAL_TILT * revolution_angle.sin(),
            0.0,
            -EARTH_AXIAL_TILT * revolution_angle.cos(),
        ));
        let moon = Transform {
            translation: Vector3::new(MOON_ORBIT_RADIUS, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, MOON_AXIAL_TILT),
            scale: Vector3::new(MOON_SCALE, MOON_SCALE, MOON_SCALE),
        };
        Self {
            earth,
            moon,
            moon_theta: 0.0,
            time_scale,
        }
    }

    pub fn earth_delta(&self) -> f32 {
        EARTH_DEGREES_PER_FRAME * self.time_scale
    }

    pub fn moon_delta(&self) -> f32 {
        self.earth_delta() / EARTH_MOON_RATIO
    }

    pub fn advance(&mut self) {
        self.earth.rotation.y += self.earth_delta();

        let moon_delta = self.moon_delta();
        self.moon_theta += moon_delta;
        let angle = self.moon_theta.to_radians();
        self.moon.translation.x = MOON_ORBIT_RADIUS * angle.cos();
        self.moon.translation.z = -MOON_ORBIT_RADIUS * angle.sin();
        // same face towards the earth
        self.moon.rotation.y += moon_delta;
    }
}

impl Default for OrbitState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spin_rotates_only_the_active_axis() {
        let mut spin = SpinState::new();
        spin.advance();
        spin.advance();
        assert_eq!(spin.theta, [3.0, 0.0, 0.0]);

        spin.select_axis(Axis::Z);
        spin.advance();
        assert_eq!(spin.theta, [3.0, 0.0, 1.5]);
    }

    #[test]
    fn translation_bounces_and_switches_axis() {
        let mut spin = SpinState::new();
        // x reaches the boundary first: 0.8 / 0.00354 ~ 226 frames
        let mut frames = 0;
        while spin.axis == Axis::X {
            spin.advance();
            frames += 1;
            assert!(frames < 1000, "translation never bounced");
        }
        assert_eq!(spin.axis, Axis::Y);
        assert!(spin.translate[0] < TRANSLATE_BOUNDARY);
        assert!(spin.translate[0] >= TRANSLATE_BOUNDARY - 2.0 * TRANSLATE_VELOCITY[0]);
        assert!(spin.translate[1] > 0.0 && spin.translate[1] < TRANSLATE_BOUNDARY);
    }

    #[test]
    fn translation_stays_near_the_boundary() {
        let mut spin = SpinState::new();
        for _ in 0..10_000 {
            spin.advance();
            for (t, v) in spin.translate.iter().zip(TRANSLATE_VELOCITY) {
                assert!(t.abs() <= TRANSLATE_BOUNDARY + v + 1e-4);
            }
        }
    }

    #[test]
    fn scale_breathes_within_range() {
        let mut spin = SpinState::new();
        let (min, max) = SCALE_RANGE;
        let mut went_up = false;
        let mut went_down = false;
        let mut last = spin.scale[0];
        for _ in 0..5_000 {
            spin.advance();
            let s = spin.scale[0];
            went_up |= s > last;
            went_down |= s < last;
            last = s;
            assert!(s >= min - 2.0 * SCALE_VELOCITY && s <= max + 2.0 * SCALE_VELOCITY);
            assert_eq!(spin.scale[0], spin.scale[1]);
        }
        assert!(went_up && went_down);
    }

    #[test]
    fn spin_uses_the_transform_rotation_order() {
        let mut spin = SpinState::new();
        spin.theta = [30.0, 45.0, 60.0];
        spin.translate = [0.2, -0.1];
        spin.scale = [0.5; 3];
        let expected = Matrix4::from_translation(Vector3::new(0.2, -0.1, 0.0))
            * Matrix4::from_angle_x(cgmath::Deg(30.0))
            * Matrix4::from_angle_z(cgmath::Deg(60.0))
            * Matrix4::from_angle_y(cgmath::Deg(45.0))
            * Matrix4::from_scale(0.5);
        let actual = spin.model_matrix();
        for (a, e) in [actual.x, actual.y, actual.z, actual.w]
            .iter()
            .zip([expected.x, expected.y, expected.z, expected.w])
        {
            assert_relative_eq!(a.x, e.x, epsilon = 1e-5);
            assert_relative_eq!(a.y, e.y, epsilon = 1e-5);
            assert_relative_eq!(a.z, e.z, epsilon = 1e-5);
            assert_relative_eq!(a.w, e.w, epsilon = 1e-5);
        }
        assert_eq!(spin.transform().rotation, Vector3::new(30.0, 45.0, 60.0));
    }

    #[test]
    fn axis_cycles_through_all_three() {
        assert_eq!(Axis::X.next(), Axis::Y);
        assert_eq!(Axis::Y.next(), Axis::Z);
        assert_eq!(Axis::Z.next(), Axis::X);
    }

    #[test]
    fn color_cycle_wraps_after_a_thousand_frames() {
        let mut cycle = ColorCycle::default();
        for _ in 0..500 {
            cycle.advance();
        }
        assert_relative_eq!(cycle.theta, PI, epsilon = 1e-3);
        for _ in 0..1000 {
            cycle.advance();
            assert!(cycle.theta >= 0.0 && cycle.theta < 2.0 * PI);
        }
    }

    #[test]
    fn hue_rotation_keeps_greys_and_cycles_primaries() {
        let cycle = ColorCycle { theta: 2.0 * PI / 3.0 };
        let hue = cycle.hue_matrix();
        let grey = hue * Vector3::new(0.4, 0.4, 0.4);
        for c in [grey.x, grey.y, grey.z] {
            assert_relative_eq!(c, 0.4, epsilon = 1e-5);
        }
        let red = hue * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(red.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(red.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(red.z, 0.0, epsilon = 1e-5);

        let start = ColorCycle::default().hue_matrix() * Vector3::new(0.2, 0.5, 0.9);
        assert_relative_eq!(start.x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(start.z, 0.9, epsilon = 1e-6);
    }

    #[test]
    fn earth_tilt_matches_revolution_angle() {
        let orbit = OrbitState::default();
        let tilt = 23.5 * (3.0 * PI / 4.0).sin();
        assert_relative_eq!(orbit.earth.rotation.x, -tilt, epsilon = 1e-5);
        assert_relative_eq!(orbit.earth.rotation.z, tilt, epsilon = 1e-5);
    }

    #[test]
    fn moon_orbits_at_fixed_radius() {
        let mut orbit = OrbitState::new(40.0);
        for _ in 0..2_000 {
            orbit.advance();
            let t = orbit.moon.translation;
            assert_relative_eq!((t.x * t.x + t.z * t.z).sqrt(), MOON_ORBIT_RADIUS, epsilon = 1e-4);
            assert_eq!(t.y, 0.0);
        }
    }

    #[test]
    fn moon_is_tidally_locked() {
        let mut orbit = OrbitState::new(3.0);
        for _ in 0..100 {
            orbit.advance();
        }
        assert_relative_eq!(orbit.moon.rotation.y, orbit.moon_theta, epsilon = 1e-4);
        assert_relative_eq!(orbit.earth.rotation.y, 100.0 * 0.75, epsilon = 1e-3);
        assert_relative_eq!(orbit.moon_theta, 100.0 * 0.75 / EARTH_MOON_RATIO, epsilon = 1e-3);
    }

    #[test]
    fn first_quarter_orbit_moves_towards_negative_z() {
        let mut orbit = OrbitState::new(1.0);
        orbit.moon_theta = 90.0 - orbit.moon_delta();
        orbit.advance();
        assert_relative_eq!(orbit.moon.translation.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(orbit.moon.translation.z, -MOON_ORBIT_RADIUS, epsilon = 1e-4);
    }
}
