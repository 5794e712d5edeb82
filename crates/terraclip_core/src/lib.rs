//! # TERRACLIP Core
//!
//! Shared building blocks for the clipmap terrain pipeline:
//! - Small `Vec2`/`IVec2` types used for camera positions and level offsets
//! - The `HeightSource` trait every height generator implements
//! - Arena-and-index instance storage, reset once per frame
//! - Frame-alternating double buffers for upload staging
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the per-frame path** - storage is reserved up front
//! 2. **No process-wide mutable state** - everything lives in owned structs
//! 3. **Indices, not pointers** - batches refer to arena ranges by offset
//!
//! ## Example
//!
//! ```rust,ignore
//! use terraclip_core::{InstanceArena, Vec2};
//!
//! let mut arena: InstanceArena<[f32; 4]> = InstanceArena::new(128);
//! arena.reset();
//! let start = arena.align_to(4)?;
//! arena.push([0.0; 4])?;
//! let batch = arena.range_from(start);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod height;
pub mod math;
pub mod memory;
pub mod sync;

pub use height::{HeightSource, LevelSampler};
pub use math::{IVec2, Vec2};
pub use memory::{ArenaFull, ArenaRange, InstanceArena};
pub use sync::FrameDoubleBuffer;
