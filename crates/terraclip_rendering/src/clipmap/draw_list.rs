//! Per-level block placement and the frame's draw list.
//!
//! ```text
//! level 0:   4x4 blocks, solid       level >= 1:   B B V B B
//!                                                   B . . . B
//!                                                   H . . . H
//!                                                   B . . . B
//!                                                   B B V B B
//!
//! B: main block    V, H: ring fixups    .: hole (finer level and trim)
//! ```

use terraclip_core::IVec2;

use super::block::{BlockKind, Edge};
use super::geometry::ClipmapGeometry;
use super::offsets::trim_quadrant;
use crate::backend::MeshId;
use crate::instancing::{DrawBatch, DrawCommand, InstanceBuffer, InstanceParams};

/// Largest number of placements one kind has on one level.
const MAX_PLACEMENTS: usize = 16;

/// Local origins of one kind's instances on one level, in that level's
/// vertex units.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placements {
    items: [IVec2; MAX_PLACEMENTS],
    len: usize,
}

impl Placements {
    const fn new() -> Self {
        Self {
            items: [IVec2::ZERO; MAX_PLACEMENTS],
            len: 0,
        }
    }

    fn push(&mut self, local: IVec2) {
        self.items[self.len] = local;
        self.len += 1;
    }

    pub(crate) fn as_slice(&self) -> &[IVec2] {
        &self.items[..self.len]
    }
}

/// Cells along one edge of a level frame: level 0 is a solid 4x4 block
/// grid, ring levels add the fixup column.
pub(crate) const fn frame_cells(level: u32, size: u32) -> i32 {
    let blocks = 4 * (size as i32 - 1);
    if level == 0 {
        blocks
    } else {
        blocks + 2
    }
}

/// Where `kind` is placed on `level`, given every level's offset.
pub(crate) fn placements(kind: BlockKind, level: u32, offsets: &[IVec2], size: u32) -> Placements {
    let levels = offsets.len() as u32;
    let block = (size - 1) as i32;
    let fixup = (2 * size - 2) as i32;
    // Ring blocks past the hole shift by the fixup width
    let ring = |i: i32| i * block + if i >= 2 { 2 } else { 0 };
    let mut out = Placements::new();

    match kind {
        BlockKind::MainBlock => {
            for z in 0..4 {
                for x in 0..4 {
                    if level == 0 {
                        out.push(IVec2::new(x * block, z * block));
                    } else if !((1..=2).contains(&x) && (1..=2).contains(&z)) {
                        out.push(IVec2::new(ring(x), ring(z)));
                    }
                }
            }
        }
        BlockKind::RingFixupVertical if level > 0 => {
            out.push(IVec2::new(fixup, 0));
            out.push(IVec2::new(fixup, 3 * block + 2));
        }
        BlockKind::RingFixupHorizontal if level > 0 => {
            out.push(IVec2::new(0, fixup));
            out.push(IVec2::new(3 * block + 2, fixup));
        }
        BlockKind::TrimFull if level == 1 => {
            out.push(IVec2::splat(block));
        }
        BlockKind::TrimQuadrant(quadrant) if level >= 2 => {
            let l = level as usize;
            if trim_quadrant(offsets[l - 1], offsets[l], level, size) == quadrant {
                out.push(IVec2::splat(block));
            }
        }
        BlockKind::DegenerateSeam(edge) if level + 1 < levels => {
            let far = frame_cells(level, size);
            // Second half overlaps the first where the frame is shorter than two
            let second = far - (2 * size) as i32;
            for start in [0, second] {
                out.push(match edge {
                    Edge::Left => IVec2::new(0, start),
                    Edge::Right => IVec2::new(far, start),
                    Edge::Top => IVec2::new(start, 0),
                    Edge::Bottom => IVec2::new(start, far),
                });
                if second == 0 {
                    break;
                }
            }
        }
        _ => {}
    }
    out
}

/// The frame's batched, culled instances.
///
/// Borrowed from the mesh; valid until the next `build_draw_list`.
#[derive(Debug, Clone, Copy)]
pub struct DrawList<'a> {
    geometry: &'a ClipmapGeometry,
    buffer: &'a InstanceBuffer,
    culled: u32,
}

impl<'a> DrawList<'a> {
    pub(crate) const fn new(geometry: &'a ClipmapGeometry, buffer: &'a InstanceBuffer, culled: u32) -> Self {
        Self {
            geometry,
            buffer,
            culled,
        }
    }

    /// One batch per block kind with at least one visible instance.
    #[inline]
    #[must_use]
    pub fn batches(&self) -> &'a [DrawBatch] {
        self.buffer.batches()
    }

    /// Instances of one batch.
    #[inline]
    #[must_use]
    pub fn instances(&self, batch: &DrawBatch) -> &'a [InstanceParams] {
        self.buffer.instances(batch)
    }

    /// Whole instance buffer as bytes, padding included.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.buffer.as_bytes()
    }

    /// Number of draw calls the list needs.
    #[inline]
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.batches().len()
    }

    /// Visible instances across all batches.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.batches().iter().map(DrawBatch::instance_count).sum()
    }

    /// One instanced draw per batch, against the static mesh `mesh`.
    pub fn draw_commands(&self, mesh: MeshId) -> impl Iterator<Item = DrawCommand> + 'a {
        let geometry = self.geometry;
        self.batches().iter().map(move |batch| DrawCommand {
            mesh,
            kind: batch.kind,
            index_range: geometry.range(batch.kind).index_range(),
            instance_count: batch.instance_count() as u32,
            instance_buffer_offset: batch.uniform_buffer_offset,
        })
    }

    /// Candidates dropped by culling.
    #[inline]
    #[must_use]
    pub const fn culled(&self) -> u32 {
        self.culled
    }
}
