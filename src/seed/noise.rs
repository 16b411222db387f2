//! Seeded value noise and fractal Brownian motion

use std::collections::HashMap;
use std::f64::consts::PI;

use super::random::seeded_random;

/// Stride folding a 2D lattice point into one random index: `xi * 1000 + yi`
const LATTICE_STRIDE: i64 = 1000;

#[inline]
fn lattice_index(xi: i64, yi: i64) -> i64 {
    xi * LATTICE_STRIDE + yi
}

#[inline]
fn cosine_smooth(t: f64) -> f64 {
    (1.0 - (t * PI).cos()) * 0.5
}

/// Value noise at `(x, y)` scaled by `frequency`, in `[-1, 1]`.
///
/// Corner values come from `seeded_random` at the four surrounding integer
/// lattice points and are blended with cosine-smoothed bilinear weights.
pub fn seeded_noise(seed: &str, x: f64, y: f64, frequency: f64) -> f64 {
    sample_with(x, y, frequency, |index| seeded_random(seed, index))
}

/// Fractal Brownian motion over `seeded_noise`, normalized to `[-1, 1]`.
///
/// Frequency doubles and amplitude decays by `persistence` each octave.
/// Zero octaves yields 0.
pub fn fbm_noise(seed: &str, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
    fbm_with(x, y, octaves, persistence, |x, y, f| seeded_noise(seed, x, y, f))
}

fn sample_with(x: f64, y: f64, frequency: f64, mut corner: impl FnMut(i64) -> f64) -> f64 {
    let fx = x * frequency;
    let fy = y * frequency;

    let xi = fx.floor();
    let yi = fy.floor();
    let xf = fx - xi;
    let yf = fy - yi;
    let (xi, yi) = (xi as i64, yi as i64);

    let n00 = corner(lattice_index(xi, yi));
    let n10 = corner(lattice_index(xi + 1, yi));
    let n01 = corner(lattice_index(xi, yi + 1));
    let n11 = corner(lattice_index(xi + 1, yi + 1));

    let sx = cosine_smooth(xf);
    let sy = cosine_smooth(yf);

    let nx0 = n00 * (1.0 - sx) + n10 * sx;
    let nx1 = n01 * (1.0 - sx) + n11 * sx;
    let result = nx0 * (1.0 - sy) + nx1 * sy;

    result * 2.0 - 1.0
}

fn fbm_with(
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    mut sample: impl FnMut(f64, f64, f64) -> f64,
) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += sample(x, y, frequency) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value == 0.0 { 0.0 } else { total / max_value }
}

/// Noise sampler bound to one seed that memoizes lattice values.
///
/// Filling a 64x64 grid touches the same few hundred lattice points over and
/// over; caching them avoids re-hashing while producing exactly the values of
/// [`seeded_noise`] / [`fbm_noise`].
pub struct NoiseField {
    seed: String,
    lattice: HashMap<i64, f64>,
}

impl NoiseField {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            lattice: HashMap::new(),
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    fn corner(&mut self, index: i64) -> f64 {
        let seed = &self.seed;
        *self
            .lattice
            .entry(index)
            .or_insert_with(|| seeded_random(seed, index))
    }

    /// Same as [`seeded_noise`] with this field's seed
    pub fn noise(&mut self, x: f64, y: f64, frequency: f64) -> f64 {
        sample_with(x, y, frequency, |index| self.corner(index))
    }

    /// Same as [`fbm_noise`] with this field's seed
    pub fn fbm(&mut self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        fbm_with(x, y, octaves, persistence, |x, y, f| self.noise(x, y, f))
    }

    /// Number of distinct lattice points hashed so far
    pub fn lattice_len(&self) -> usize {
        self.lattice.len()
    }
}
