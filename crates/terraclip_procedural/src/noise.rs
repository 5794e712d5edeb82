//! # Periodic Gradient Noise
//!
//! Deterministic gradient noise whose lattice wraps with a chosen period,
//! so the noise tiles exactly.
//!
//! ## Why periodic?
//!
//! The clipmap streams an unbounded window over the terrain. A height
//! function that repeats after `P` texels can be baked once and sampled
//! forever with `rem_euclid`, and the seam is invisible because the
//! lattice itself wraps.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation will produce
//! **exactly** the same values on any platform, any time.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., one noise octave).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// 8 gradient directions: axes and diagonals.
const GRADIENTS: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    /// Creates a new permutation table from a seed.
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        perm[..256].shuffle(&mut rng);

        // Double the table to avoid index wrapping
        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    /// Hashes a wrapped lattice coordinate.
    #[inline]
    fn hash(&self, x: i32, y: i32) -> u8 {
        let a = self.perm[(x & 255) as usize] as usize;
        self.perm[a + (y & 255) as usize]
    }
}

/// 2D gradient noise with a wrapping lattice.
///
/// Produces smooth, continuous values in `[-1, 1]`.
///
/// # Example
///
/// ```rust,ignore
/// let noise = PeriodicNoise::new(WorldSeed::new(42));
///
/// // Lattice of 8 cells per period: sample(x + 8, y) == sample(x, y)
/// let value = noise.sample(3.25, 1.5, 8);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
pub struct PeriodicNoise {
    /// The permutation table.
    perm_table: PermutationTable,
}

impl PeriodicNoise {
    /// Creates a new noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples noise at `(x, y)` in lattice units, wrapping the lattice
    /// every `period` cells on both axes.
    ///
    /// # Panics
    ///
    /// Panics if `period` is not positive.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, period: i32) -> f64 {
        assert!(period > 0, "noise period must be positive");

        let x0 = fast_floor(x);
        let y0 = fast_floor(y);
        let fx = x - f64::from(x0);
        let fy = y - f64::from(y0);

        let xi0 = x0.rem_euclid(period);
        let xi1 = (x0 + 1).rem_euclid(period);
        let yi0 = y0.rem_euclid(period);
        let yi1 = (y0 + 1).rem_euclid(period);

        let n00 = self.corner(xi0, yi0, fx, fy);
        let n10 = self.corner(xi1, yi0, fx - 1.0, fy);
        let n01 = self.corner(xi0, yi1, fx, fy - 1.0);
        let n11 = self.corner(xi1, yi1, fx - 1.0, fy - 1.0);

        let u = fade(fx);
        let v = fade(fy);
        let value = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v);
        value.clamp(-1.0, 1.0)
    }

    /// Dot product of a corner gradient with the offset to that corner.
    #[inline]
    fn corner(&self, xi: i32, yi: i32, dx: f64, dy: f64) -> f64 {
        let grad = GRADIENTS[(self.perm_table.hash(xi, yi) & 7) as usize];
        grad[0] * dx + grad[1] * dy
    }
}

/// Quintic smoothstep, zero first and second derivative at 0 and 1.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Fast floor function.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let noise1 = PeriodicNoise::new(seed);
        let noise2 = PeriodicNoise::new(seed);

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(
                noise1.sample(x, y, 16),
                noise2.sample(x, y, 16),
                "Noise should be deterministic"
            );
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = PeriodicNoise::new(WorldSeed::new(1));
        let noise2 = PeriodicNoise::new(WorldSeed::new(2));

        let differs = (0..64).any(|i| {
            let x = f64::from(i) * 0.37 + 0.1;
            noise1.sample(x, x * 0.5, 32) != noise2.sample(x, x * 0.5, 32)
        });

        assert!(differs, "Different seeds should produce different results");
    }

    #[test]
    fn test_range() {
        let noise = PeriodicNoise::new(WorldSeed::new(42));

        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, y, 64);

            assert!(
                (-1.0..=1.0).contains(&value),
                "Value {value} out of range at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_lattice_wraps() {
        let noise = PeriodicNoise::new(WorldSeed::new(7));

        for i in 0..200 {
            let x = f64::from(i) * 0.29;
            let y = f64::from(i) * 0.41;
            let base = noise.sample(x, y, 8);
            assert!((base - noise.sample(x + 8.0, y, 8)).abs() < 1e-9);
            assert!((base - noise.sample(x, y - 16.0, 8)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = PeriodicNoise::new(WorldSeed::new(3));
        assert_eq!(noise.sample(2.0, 5.0, 8), 0.0);
    }

    #[test]
    fn test_continuity() {
        let noise = PeriodicNoise::new(WorldSeed::new(42));

        let delta = 0.001;
        let v1 = noise.sample(10.3, 10.7, 32);
        let v2 = noise.sample(10.3 + delta, 10.7, 32);
        let v3 = noise.sample(10.3, 10.7 + delta, 32);

        assert!((v1 - v2).abs() < 0.01, "Noise should be continuous");
        assert!((v1 - v3).abs() < 0.01, "Noise should be continuous");
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        let derived1 = base.derive(1);
        let derived2 = base.derive(2);

        assert_ne!(derived1, derived2, "Different purposes should give different seeds");
        assert_eq!(derived1, base.derive(1), "Same purpose should give same seed");
        assert_ne!(derived1, base, "Derived seed should differ from base");
    }
}
