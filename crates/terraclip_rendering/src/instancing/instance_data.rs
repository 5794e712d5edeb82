//! Instance data structures for GPU upload.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::backend::MeshId;
use crate::clipmap::BlockKind;

/// Per-instance data sent to the GPU.
///
/// The vertex shader reconstructs a vertex from its `u8` grid coordinate:
///
/// ```text
/// world   = world_offset + local_vertex * vertex_scale
/// texture = texture_offset + (local_vertex + 0.5) * texture_scale
/// ```
///
/// Texture coordinates rely on repeat addressing; `texture_offset` is
/// already reduced into `[0, 1)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceParams {
    /// World-space XZ position of the block's local origin.
    pub world_offset: [f32; 2],
    /// Texture-space size of one vertex step (`1 / window_size`).
    pub texture_scale: [f32; 2],
    /// Texture-space position of the block's local origin.
    pub texture_offset: [f32; 2],
    /// World units per vertex step at this level.
    pub vertex_scale: f32,
    /// Clipmap level, used as the texture array layer.
    pub level: f32,
}

impl InstanceParams {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// World-space XZ position of a local vertex.
    #[inline]
    #[must_use]
    pub fn world_position(&self, local: [f32; 2]) -> [f32; 2] {
        [
            self.world_offset[0] + local[0] * self.vertex_scale,
            self.world_offset[1] + local[1] * self.vertex_scale,
        ]
    }
}

/// One instanced draw: a block template drawn for a run of instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    /// Static mesh holding every block template.
    pub mesh: MeshId,
    /// Block template being drawn.
    pub kind: BlockKind,
    /// Index buffer range of the template.
    pub index_range: Range<u32>,
    /// Number of instances.
    pub instance_count: u32,
    /// Byte offset of the first instance in the uploaded instance buffer.
    pub instance_buffer_offset: usize,
}
