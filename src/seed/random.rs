//! Seeded pseudo-random primitives
//!
//! All functions are pure in `(seed, index)`: the same inputs give the same
//! output on every platform.

use super::hash::digest;

/// Resolution of `seeded_random`; values are multiples of `1 / RANDOM_RESOLUTION`
const RANDOM_RESOLUTION: u64 = 1_000_000;

/// Reproducible random number in `[0, 1)`.
///
/// Hashes `"<seed>||<index>"`, reads the first 64 bits of the digest as a
/// big-endian integer and keeps it modulo one million.
pub fn seeded_random(seed: &str, index: i64) -> f64 {
    let bytes = digest(&[&seed, &index]);
    let n = bytes[..8]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64);
    (n % RANDOM_RESOLUTION) as f64 / RANDOM_RESOLUTION as f64
}

/// Reproducible random integer in `[min, max]` inclusive.
///
/// `min > max` is a caller error; the result is clamped to `min`.
pub fn seeded_random_int(seed: &str, min: i64, max: i64, index: i64) -> i64 {
    if max <= min {
        return min;
    }
    let span = (max - min + 1) as f64;
    (seeded_random(seed, index) * span).floor() as i64 + min
}

/// Reproducible choice from a slice. Returns `None` for an empty slice.
pub fn seeded_choice<'a, T>(seed: &str, items: &'a [T], index: i64) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = seeded_random_int(seed, 0, items.len() as i64 - 1, index);
    items.get(idx as usize)
}
