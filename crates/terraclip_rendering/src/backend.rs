//! # Backend Seams
//!
//! The terrain never talks to a graphics API. Everything it needs from one
//! is expressed as these traits:
//!
//! - `UploadSink`: sub-region writes into the height texture array
//! - `DrawSink`: the frame's instance bytes and one instanced draw per batch
//! - `RenderBackend`: both, plus the one-time resource creation
//!
//! A backend that records calls instead of issuing them is enough to drive
//! the whole pipeline headless.

use crate::heightfield::HeightTexel;
use crate::instancing::DrawCommand;

/// Handle to a static mesh created by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Handle to a height texture array created by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Receives height texel rectangles.
pub trait UploadSink {
    /// Writes `data` (row-major, `width * height` texels) into layer
    /// `level` at texel `(x, y)`.
    fn upload_region(&mut self, level: u32, x: u32, y: u32, width: u32, height: u32, data: &[HeightTexel]);

    /// Blocks until every upload issued during `frame` has been consumed.
    fn wait_for_frame(&mut self, _frame: u64) {}
}

/// Receives the frame's instance data and draw calls.
pub trait DrawSink {
    /// Replaces the instance buffer contents for this frame.
    fn upload_instances(&mut self, bytes: &[u8]);

    /// Issues one instanced draw.
    fn issue_instanced_draw(&mut self, command: &DrawCommand);
}

/// A complete backend.
pub trait RenderBackend: UploadSink + DrawSink {
    /// Creates the immutable mesh holding every block template.
    fn create_static_mesh(&mut self, vertices: &[[u8; 2]], indices: &[u16]) -> MeshId;

    /// Creates a `size x size` two-channel float texture array with
    /// `layers` layers.
    fn create_height_texture(&mut self, size: u32, layers: u32) -> TextureId;
}
