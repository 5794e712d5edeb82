//! # Frame Synchronization
//!
//! ## The Problem
//!
//! ```text
//! Frame N:    CPU writes staging buffer, GPU copies it into the texture
//! Frame N+1:  CPU wants to write again - GPU may still be reading
//!
//! One buffer:  CPU waits for GPU every frame → stall
//! ```
//!
//! ## The Solution: Double Buffering
//!
//! ```text
//! Frame N:    CPU writes Buffer A, GPU reads Buffer B (frame N-1)
//! Frame N+1:  CPU writes Buffer B, GPU reads Buffer A (frame N)
//! ```
//!
//! Before a buffer is reused the owner waits for the frame that last
//! filled it (two frames ago), which is almost always already complete.

mod double_buffer;

pub use double_buffer::FrameDoubleBuffer;
