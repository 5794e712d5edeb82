//! Fly-through errors.

use terraclip_procedural::HeightmapError;
use terraclip_rendering::TerrainError;
use thiserror::Error;

/// Everything that can stop a fly-through.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlythroughError {
    /// The terrain pipeline failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    /// The heightmap could not be generated.
    #[error(transparent)]
    Heightmap(#[from] HeightmapError),

    /// A camera or run parameter is out of range.
    #[error("invalid fly-through configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse fly-through configuration: {0}")]
    ConfigParse(String),

    /// The configuration file could not be read.
    #[error("failed to read fly-through configuration: {0}")]
    ConfigIo(String),
}

/// Result type for fly-through operations.
pub type FlythroughResult<T> = Result<T, FlythroughError>;
