//! # Bandpass Periodic Heightmap
//!
//! Bakes a band of noise octaves into one `period x period` table and
//! serves it through `HeightSource`.
//!
//! ## The band
//!
//! ```text
//! octave k:  lattice cells per period = base_cells * 2^k
//!            amplitude               = persistence^k
//!
//! k = 0 .. octaves      (nothing below base_cells, nothing above the top octave)
//! ```
//!
//! Every octave has an integer number of lattice cells per period, so the
//! sum tiles exactly and lookups reduce to `rem_euclid`.

use serde::{Deserialize, Serialize};
use terraclip_core::HeightSource;
use thiserror::Error;

use crate::noise::{PeriodicNoise, WorldSeed};

/// Errors from heightmap generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeightmapError {
    /// The generator configuration is unusable.
    #[error("invalid heightmap configuration: {0}")]
    InvalidConfig(String),
}

/// Heightmap generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeightmapConfig {
    /// Generation seed.
    pub seed: WorldSeed,
    /// Tiling period in level-0 texels.
    pub period: i32,
    /// Lattice cells per period for the lowest octave.
    pub base_cells: i32,
    /// Number of octaves in the band.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Peak height in world units.
    pub amplitude: f32,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            period: 1024,
            base_cells: 4,
            octaves: 6,
            persistence: 0.5,
            amplitude: 18.0,
        }
    }
}

impl HeightmapConfig {
    /// Checks that the configuration can be baked.
    ///
    /// # Errors
    ///
    /// Returns `HeightmapError::InvalidConfig` describing the first problem.
    pub fn validate(&self) -> Result<(), HeightmapError> {
        if self.period <= 0 || self.period > 1 << 14 {
            return Err(HeightmapError::InvalidConfig(format!(
                "period {} must be in [1, 16384]",
                self.period
            )));
        }
        if self.base_cells <= 0 {
            return Err(HeightmapError::InvalidConfig(format!(
                "base_cells {} must be positive",
                self.base_cells
            )));
        }
        if self.octaves == 0 || self.octaves > 16 {
            return Err(HeightmapError::InvalidConfig(format!(
                "octaves {} must be in [1, 16]",
                self.octaves
            )));
        }
        let top_cells = i64::from(self.base_cells) << (self.octaves - 1);
        if top_cells > i64::from(self.period) {
            return Err(HeightmapError::InvalidConfig(format!(
                "top octave has {top_cells} cells but the period is only {} texels",
                self.period
            )));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(HeightmapError::InvalidConfig(format!(
                "persistence {} must be in (0, 1]",
                self.persistence
            )));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(HeightmapError::InvalidConfig(format!(
                "amplitude {} must be finite and non-negative",
                self.amplitude
            )));
        }
        Ok(())
    }
}

/// A baked, exactly periodic height function.
///
/// # Example
///
/// ```rust,ignore
/// let map = PeriodicHeightmap::generate(&HeightmapConfig::default())?;
/// assert_eq!(map.sample_height(3, 4), map.sample_height(3 + map.period(), 4));
/// ```
#[derive(Clone, Debug)]
pub struct PeriodicHeightmap {
    /// Tiling period.
    period: i32,
    /// Row-major heights, `period * period` entries.
    heights: Vec<f32>,
    /// Smallest baked height.
    min_height: f32,
    /// Largest baked height.
    max_height: f32,
}

impl PeriodicHeightmap {
    /// Bakes a heightmap.
    ///
    /// # Errors
    ///
    /// Returns `HeightmapError::InvalidConfig` if the configuration fails
    /// validation.
    pub fn generate(config: &HeightmapConfig) -> Result<Self, HeightmapError> {
        config.validate()?;

        let period = config.period;
        let octaves: Vec<(PeriodicNoise, i32, f64)> = (0..config.octaves)
            .map(|k| {
                let noise = PeriodicNoise::new(config.seed.derive(u64::from(k)));
                let cells = config.base_cells << k;
                let weight = config.persistence.powi(k as i32);
                (noise, cells, weight)
            })
            .collect();
        let total_weight: f64 = octaves.iter().map(|(_, _, w)| w).sum();

        let side = period as usize;
        let mut heights = Vec::with_capacity(side * side);
        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;

        for y in 0..period {
            for x in 0..period {
                let mut total = 0.0;
                for (noise, cells, weight) in &octaves {
                    let scale = f64::from(*cells) / f64::from(period);
                    total += noise.sample(f64::from(x) * scale, f64::from(y) * scale, *cells) * weight;
                }
                let height = (total / total_weight) as f32 * config.amplitude;
                min_height = min_height.min(height);
                max_height = max_height.max(height);
                heights.push(height);
            }
        }

        tracing::info!(
            period,
            octaves = config.octaves,
            min_height,
            max_height,
            "baked periodic heightmap"
        );

        Ok(Self {
            period,
            heights,
            min_height,
            max_height,
        })
    }

    /// Smallest and largest baked heights.
    #[must_use]
    pub const fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }
}

impl HeightSource for PeriodicHeightmap {
    #[inline]
    fn sample_height(&self, x: i32, y: i32) -> f32 {
        let x = x.rem_euclid(self.period) as usize;
        let y = y.rem_euclid(self.period) as usize;
        self.heights[y * self.period as usize + x]
    }

    #[inline]
    fn period(&self) -> i32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> HeightmapConfig {
        HeightmapConfig {
            seed: WorldSeed::new(9),
            period: 64,
            base_cells: 2,
            octaves: 4,
            persistence: 0.5,
            amplitude: 10.0,
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = PeriodicHeightmap::generate(&small_config()).unwrap();
        let b = PeriodicHeightmap::generate(&small_config()).unwrap();

        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(a.sample_height(x, y), b.sample_height(x, y));
            }
        }
    }

    #[test]
    fn test_heights_within_amplitude() {
        let map = PeriodicHeightmap::generate(&small_config()).unwrap();
        let (min, max) = map.height_range();

        assert!(min >= -10.0 && max <= 10.0, "range [{min}, {max}] exceeds amplitude");
        assert!(max > min, "heightmap should not be flat");
    }

    #[test]
    fn test_negative_coordinates_wrap() {
        let map = PeriodicHeightmap::generate(&small_config()).unwrap();
        assert_eq!(map.sample_height(-1, -64), map.sample_height(63, 0));
    }

    #[test]
    fn test_rejects_band_above_period() {
        let config = HeightmapConfig {
            period: 16,
            base_cells: 4,
            octaves: 4,
            ..small_config()
        };
        assert!(matches!(
            PeriodicHeightmap::generate(&config),
            Err(HeightmapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_toml() {
        let config: HeightmapConfig = toml::from_str(
            r#"
            seed = 77
            period = 256
            octaves = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, WorldSeed::new(77));
        assert_eq!(config.period, 256);
        assert_eq!(config.octaves, 3);
        assert_eq!(config.base_cells, HeightmapConfig::default().base_cells);
        assert!(config.validate().is_ok());
    }
}
