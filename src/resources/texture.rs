//! Procedurally generated textures.
//!
//! The demos never read images from disk or the network. Every diffuse map is
//! generated here from a seed, which keeps the demos self-contained and the
//! output reproducible. Spherical maps wrap horizontally so the sphere seam
//! stays invisible.

use std::f32::consts::{PI, TAU};

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::StdRng};

pub const TEXTURE_SIZE: u32 = 256;

/// Number of planet layers in the hidden-surface-removal scene.
pub const PLANET_LAYERS: usize = 11;

/// Base and accent colour of each planet layer.
pub const PLANET_PALETTE: [([u8; 3], [u8; 3]); PLANET_LAYERS] = [
    ([181, 166, 151], [120, 110, 100]),
    ([230, 200, 140], [180, 120, 60]),
    ([40, 90, 170], [60, 140, 70]),
    ([190, 90, 50], [120, 50, 30]),
    ([210, 170, 120], [150, 100, 70]),
    ([230, 210, 160], [190, 160, 110]),
    ([160, 220, 230], [110, 170, 200]),
    ([60, 100, 210], [30, 50, 140]),
    ([200, 190, 180], [110, 100, 95]),
    ([250, 210, 80], [240, 120, 30]),
    ([150, 150, 150], [90, 90, 90]),
];

/// Periodic 2D value noise on a coarse random lattice.
#[derive(Debug, Clone)]
pub struct ValueNoise {
    cols: usize,
    rows: usize,
    values: Vec<f32>,
}

impl ValueNoise {
    pub fn new<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let values = (0..cols * rows).map(|_| rng.r#gen::<f32>()).collect();
        Self { cols, rows, values }
    }

    /// Smoothly interpolated value in `[0, 1]`. Both coordinates wrap at 1.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = u.rem_euclid(1.0) * self.cols as f32;
        let y = v.rem_euclid(1.0) * self.rows as f32;
        let (x0, y0) = (x.floor() as usize % self.cols, y.floor() as usize % self.rows);
        let (x1, y1) = ((x0 + 1) % self.cols, (y0 + 1) % self.rows);
        let smooth = |t: f32| t * t * (3.0 - 2.0 * t);
        let (fx, fy) = (smooth(x.fract()), smooth(y.fract()));

        let at = |col: usize, row: usize| self.values[row * self.cols + col];
        let top = at(x0, y0) + (at(x1, y0) - at(x0, y0)) * fx;
        let bottom = at(x0, y1) + (at(x1, y1) - at(x0, y1)) * fx;
        top + (bottom - top) * fy
    }

    /// Sum of `octaves` samples at doubling frequency and halving weight,
    /// normalised back into `[0, 1]`.
    pub fn fractal(&self, u: f32, v: f32, octaves: u32) -> f32 {
        let mut sum = 0.0;
        let mut weight = 1.0;
        let mut total = 0.0;
        for octave in 0..octaves.max(1) {
            let frequency = (1 << octave) as f32;
            sum += weight * self.sample(u * frequency, v * frequency);
            total += weight;
            weight *= 0.5;
        }
        sum / total
    }
}

fn opaque(c: [u8; 3]) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], 255])
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    Rgba([channel(0), channel(1), channel(2), 255])
}

/// Two coloured checkerboard with `squares` cells per side.
pub fn checkerboard(size: u32, squares: u32, a: [u8; 3], b: [u8; 3]) -> RgbaImage {
    let cell = (size / squares.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            opaque(a)
        } else {
            opaque(b)
        }
    })
}

/// Gas giant style latitude bands, distorted by noise.
pub fn banded_planet(width: u32, height: u32, base: [u8; 3], accent: [u8; 3], seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = ValueNoise::new(16, 8, &mut rng);
    let bands = rng.gen_range(3.0..9.0_f32);
    let turbulence = rng.gen_range(0.2..0.8_f32);
    RgbaImage::from_fn(width, height, |x, y| {
        let (u, v) = (x as f32 / width as f32, y as f32 / height as f32);
        let n = noise.fractal(u, v, 4);
        let t = 0.5 + 0.5 * (v * bands * PI + turbulence * n * TAU).sin();
        mix(base, accent, t)
    })
}

const LAND_LEVEL: f32 = 0.52;

/// Oceans, continents and polar caps.
pub fn earth(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = ValueNoise::new(12, 6, &mut rng);
    RgbaImage::from_fn(width, height, |x, y| {
        let (u, v) = (x as f32 / width as f32, y as f32 / height as f32);
        if !(0.06..=0.94).contains(&v) {
            return opaque([235, 240, 245]);
        }
        let n = noise.fractal(u, v, 5);
        if n > LAND_LEVEL {
            mix([50, 120, 50], [140, 120, 80], (n - LAND_LEVEL) * 4.0)
        } else {
            mix([10, 30, 90], [30, 80, 170], n / LAND_LEVEL)
        }
    })
}

/// Grey, noisy surface with dark craters.
pub fn moon(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = ValueNoise::new(16, 8, &mut rng);
    let craters: Vec<([f32; 2], f32)> = (0..24)
        .map(|_| {
            let centre = [rng.r#gen::<f32>(), rng.gen_range(0.15..0.85)];
            (centre, rng.gen_range(0.01..0.05))
        })
        .collect();
    RgbaImage::from_fn(width, height, |x, y| {
        let (u, v) = (x as f32 / width as f32, y as f32 / height as f32);
        let mut shade = noise.fractal(u, v, 4);
        for ([cu, cv], radius) in &craters {
            // horizontal distance wraps around the seam
            let du = (u - cu).abs().min(1.0 - (u - cu).abs());
            if (du * du + (v - cv) * (v - cv)).sqrt() < *radius {
                shade *= 0.55;
            }
        }
        mix([60, 60, 60], [200, 200, 195], shade)
    })
}

/// Black sky with `density * width * height` white-ish stars.
pub fn star_field(width: u32, height: u32, density: f32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let stars = ((width * height) as f32 * density.clamp(0.0, 1.0)).round() as usize;
    for _ in 0..stars {
        let x = rng.gen_range(0..width.max(1));
        let y = rng.gen_range(0..height.max(1));
        let brightness: u8 = rng.gen_range(120..=255);
        img.put_pixel(x, y, Rgba([brightness, brightness, brightness.saturating_sub(20), 255]));
    }
    img
}

/// One banded planet per [`PLANET_PALETTE`] entry, all of the same size.
pub fn planet_layers(size: u32, seed: u64) -> Vec<RgbaImage> {
    PLANET_PALETTE
        .iter()
        .enumerate()
        .map(|(idx, (base, accent))| {
            banded_planet(size, size / 2, *base, *accent, seed.wrapping_add(idx as u64))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_wraps_horizontally() {
        let noise = ValueNoise::new(8, 4, &mut StdRng::seed_from_u64(1));
        for v in [0.0, 0.3, 0.77] {
            assert!((noise.sample(0.0, v) - noise.sample(1.0, v)).abs() < 1e-6);
            assert!((noise.fractal(0.0, v, 4) - noise.fractal(1.0, v, 4)).abs() < 1e-5);
        }
    }

    #[test]
    fn noise_stays_in_unit_range() {
        let noise = ValueNoise::new(8, 4, &mut StdRng::seed_from_u64(2));
        for i in 0..200 {
            let (u, v) = (i as f32 * 0.037, i as f32 * 0.011);
            let n = noise.fractal(u, v, 5);
            assert!((0.0..=1.0).contains(&n), "{n}");
        }
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let img = checkerboard(64, 8, [255, 255, 255], [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(8, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(8, 8), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn generated_textures_are_deterministic() {
        assert_eq!(earth(64, 32, 7), earth(64, 32, 7));
        assert_eq!(moon(64, 32, 7), moon(64, 32, 7));
        assert_ne!(earth(64, 32, 7), earth(64, 32, 8));
    }

    #[test]
    fn earth_has_ice_water_and_land() {
        let img = earth(128, 64, 3);
        assert_eq!(img.get_pixel(10, 0), &Rgba([235, 240, 245, 255]));
        let greenish = img.pixels().filter(|p| p[1] > p[2]).count();
        let bluish = img.pixels().filter(|p| p[2] > p[1]).count();
        assert!(greenish > 0 && bluish > 0);
    }

    #[test]
    fn star_field_is_mostly_black() {
        let img = star_field(100, 100, 0.01, 5);
        let lit = img.pixels().filter(|p| p[0] > 0).count();
        assert!(lit > 0 && lit <= 100);
        assert!(img.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn planet_layers_share_one_size() {
        let layers = planet_layers(32, 0);
        assert_eq!(layers.len(), PLANET_LAYERS);
        assert!(layers.iter().all(|l| l.dimensions() == (32, 16)));
        assert_ne!(layers[0], layers[1]);
    }
}
