//! # Memory Management
//!
//! Pre-allocated storage for data that is rebuilt every frame.
//!
//! ## Design Philosophy
//!
//! All memory is reserved once at startup. During a frame:
//! - No heap allocations
//! - Consumers refer to stored data by integer offset, never by pointer
//! - Everything is released at once with a single `reset`

mod arena;

pub use arena::{ArenaFull, ArenaRange, InstanceArena};
