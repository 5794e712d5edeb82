//! # TERRACLIP Procedural Generation
//!
//! Deterministic, exactly periodic height functions for the clipmap.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same terrain
//! 2. **Periodic**: Heights repeat after `period` texels on both axes
//! 3. **Baked**: One table per period, sampled in O(1) with `rem_euclid`
//!
//! ## Core Components
//!
//! - `PeriodicNoise`: 2D gradient noise on a wrapping lattice
//! - `PeriodicHeightmap`: a band of noise octaves baked into a table,
//!   implementing `terraclip_core::HeightSource`
//!
//! ## Example
//!
//! ```rust,ignore
//! use terraclip_procedural::{HeightmapConfig, PeriodicHeightmap};
//! use terraclip_core::HeightSource;
//!
//! let map = PeriodicHeightmap::generate(&HeightmapConfig::default())?;
//! let h = map.sample_height(100, 200);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod heightmap;
pub mod noise;

pub use heightmap::{HeightmapConfig, HeightmapError, PeriodicHeightmap};
pub use noise::{PeriodicNoise, WorldSeed};
