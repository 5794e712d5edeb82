//! Error types for the terrain pipeline.

use terraclip_core::ArenaFull;
use thiserror::Error;

/// Errors raised while configuring or driving the terrain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// A configuration value is out of range.
    #[error("invalid terrain configuration: {0}")]
    InvalidConfig(String),

    /// More instances were produced than the instance buffer can hold.
    #[error("instance buffer overflow: {required} instances needed, capacity is {capacity}")]
    InstanceCapacityExceeded {
        /// Instances the frame needed.
        required: usize,
        /// Instances the buffer holds.
        capacity: usize,
    },

    /// Staging memory could not be reserved.
    #[error("out of memory reserving {bytes} bytes of upload staging")]
    OutOfMemory {
        /// Size of the failed reservation.
        bytes: usize,
    },

    /// A configuration file is not valid TOML for this schema.
    #[error("failed to parse terrain configuration: {0}")]
    ConfigParse(String),

    /// A configuration file could not be read.
    #[error("failed to read terrain configuration: {0}")]
    ConfigIo(String),
}

impl From<ArenaFull> for TerrainError {
    fn from(err: ArenaFull) -> Self {
        Self::InstanceCapacityExceeded {
            required: err.required,
            capacity: err.capacity,
        }
    }
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
