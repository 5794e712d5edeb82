//! # Terrain Configuration
//!
//! Construction-time parameters, loaded from TOML once at startup and
//! validated before anything is allocated.
//!
//! ```toml
//! size = 64
//! levels = 10
//! clip_scale = 0.35
//! cull_height_min = -20.0
//! cull_height_max = 20.0
//! instance_alignment = 1
//! culling = "frustum"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};

/// Instances a single level can emit: 12 blocks, 4 fixups, 1 trim and two
/// half-edge seams on each of the 4 edges.
pub const INSTANCES_PER_LEVEL: usize = 25;

/// Culling strategy, picked at configuration time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullingMode {
    /// Drop instances whose bounds miss the view frustum.
    #[default]
    Frustum,
    /// Draw every instance.
    Disabled,
}

/// Clipmap terrain parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainConfig {
    /// Vertices along one edge of a main block.
    pub size: u32,
    /// Number of clipmap levels.
    pub levels: u32,
    /// World units per level-0 grid cell.
    pub clip_scale: f32,
    /// Lower height bound used for culling boxes.
    pub cull_height_min: f32,
    /// Upper height bound used for culling boxes.
    pub cull_height_max: f32,
    /// Batch start alignment inside the instance buffer, in instances.
    pub instance_alignment: u32,
    /// Culling strategy.
    pub culling: CullingMode,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 64,
            levels: 10,
            clip_scale: 0.35,
            cull_height_min: -20.0,
            cull_height_max: 20.0,
            instance_alignment: 1,
            culling: CullingMode::Frustum,
        }
    }
}

impl TerrainConfig {
    /// Smallest supported block size.
    pub const MIN_SIZE: u32 = 2;
    /// Largest block size whose level frame fits `u8` vertex coordinates.
    pub const MAX_SIZE: u32 = 64;
    /// Largest supported level count.
    pub const MAX_LEVELS: u32 = 16;
    /// Largest supported batch alignment.
    pub const MAX_INSTANCE_ALIGNMENT: u32 = 16;

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML, `InvalidConfig` for values out of range.
    pub fn from_toml_str(text: &str) -> TerrainResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TerrainError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `ConfigIo` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TerrainError::ConfigIo(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns `TerrainError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> TerrainResult<()> {
        if !self.size.is_power_of_two() || !(Self::MIN_SIZE..=Self::MAX_SIZE).contains(&self.size) {
            return Err(TerrainError::InvalidConfig(format!(
                "size {} must be a power of two in [{}, {}]",
                self.size,
                Self::MIN_SIZE,
                Self::MAX_SIZE
            )));
        }
        if !(1..=Self::MAX_LEVELS).contains(&self.levels) {
            return Err(TerrainError::InvalidConfig(format!(
                "levels {} must be in [1, {}]",
                self.levels,
                Self::MAX_LEVELS
            )));
        }
        if !self.clip_scale.is_finite() || self.clip_scale <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "clip_scale {} must be finite and positive",
                self.clip_scale
            )));
        }
        if !self.cull_height_min.is_finite()
            || !self.cull_height_max.is_finite()
            || self.cull_height_min >= self.cull_height_max
        {
            return Err(TerrainError::InvalidConfig(format!(
                "cull height range [{}, {}] must be finite with min < max",
                self.cull_height_min, self.cull_height_max
            )));
        }
        if !self.instance_alignment.is_power_of_two()
            || self.instance_alignment > Self::MAX_INSTANCE_ALIGNMENT
        {
            return Err(TerrainError::InvalidConfig(format!(
                "instance_alignment {} must be a power of two <= {}",
                self.instance_alignment,
                Self::MAX_INSTANCE_ALIGNMENT
            )));
        }
        // 12 batches, padding in front of all but the first
        let worst_case = INSTANCES_PER_LEVEL * self.levels as usize
            + 11 * (self.instance_alignment as usize - 1);
        if worst_case > self.instance_capacity() {
            return Err(TerrainError::InvalidConfig(format!(
                "instance_alignment {} needs up to {worst_case} instances, capacity is {}",
                self.instance_alignment,
                self.instance_capacity()
            )));
        }
        Ok(())
    }

    /// Texels along one edge of a level's height window: `4 * size`.
    #[inline]
    #[must_use]
    pub const fn window_size(&self) -> u32 {
        4 * self.size
    }

    /// Fixed capacity of the per-frame instance buffer.
    #[inline]
    #[must_use]
    pub const fn instance_capacity(&self) -> usize {
        2 * INSTANCES_PER_LEVEL * self.levels as usize
    }
}

/// A validated configuration, owned by the frame driver and lent to the
/// mesh and height field at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainContext {
    config: TerrainConfig,
}

impl TerrainContext {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `TerrainError::InvalidConfig` if validation fails.
    pub fn new(config: TerrainConfig) -> TerrainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The wrapped configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Block size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.config.size
    }

    /// Level count.
    #[inline]
    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.config.levels
    }

    /// World units per level-0 grid cell.
    #[inline]
    #[must_use]
    pub const fn clip_scale(&self) -> f32 {
        self.config.clip_scale
    }
}
