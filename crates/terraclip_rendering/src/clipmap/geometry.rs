//! # Static Block Geometry
//!
//! Builds every block template once: one shared vertex buffer of `u8` grid
//! coordinates and one shared `u16` index buffer of triangle strips.
//!
//! ## Strip layout
//!
//! Grids are stamped as a single zig-zag strip without primitive restart:
//!
//! ```text
//! row 0:  0 . 2 . 4          strip 0 runs left to right,
//!         |/|/|/|            strip 1 runs right to left,
//! row 1:  1 . 3 . 5 ...      the turn costs one degenerate triangle
//! ```
//!
//! A `w x h` grid costs `2 * w * (h - 1) - (h - 1) + 1` indices. Templates
//! made of several grids (trims) bridge them with repeated indices, padded
//! so every grid starts on an even strip position and keeps its winding.

use std::sync::Arc;

use super::block::{BlockKind, BlockRange, Edge, LocalBounds, Quadrant};

/// Indices needed to stamp a `width x height` grid as one strip.
#[inline]
#[must_use]
pub const fn grid_index_count(width: u32, height: u32) -> u32 {
    2 * width * (height - 1) - (height - 1) + 1
}

/// Immutable vertex and index data for every block template.
///
/// Buffers are reference counted so render submissions can share them.
#[derive(Debug, Clone)]
pub struct ClipmapGeometry {
    size: u32,
    vertices: Arc<[[u8; 2]]>,
    indices: Arc<[u16]>,
    ranges: [BlockRange; BlockKind::COUNT],
}

impl ClipmapGeometry {
    /// Builds every template for blocks of `size` vertices.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `[2, 64]`; configuration validation
    /// guarantees this never happens for a `TerrainContext`.
    #[must_use]
    pub fn build(size: u32) -> Self {
        assert!((2..=64).contains(&size), "block size {size} out of range");

        let mut builder = Builder::default();
        let mut ranges = [BlockRange::default(); BlockKind::COUNT];
        let seam_length = 2 * size + 1;
        let trim_edge = 2 * size + 1;

        for kind in BlockKind::ALL {
            builder.begin_block();
            let culling_range = match kind {
                BlockKind::MainBlock => {
                    builder.stamp_grid(0, 0, size, size);
                    LocalBounds::extent(size - 1, size - 1)
                }
                BlockKind::RingFixupVertical => {
                    builder.stamp_grid(0, 0, 3, size);
                    LocalBounds::extent(2, size - 1)
                }
                BlockKind::RingFixupHorizontal => {
                    builder.stamp_grid(0, 0, size, 3);
                    LocalBounds::extent(size - 1, 2)
                }
                BlockKind::TrimFull => {
                    let far = trim_edge - 2;
                    builder.stamp_grid(0, 0, trim_edge, 2);
                    builder.stamp_grid(far, 1, 2, trim_edge - 2);
                    builder.stamp_grid(0, far, trim_edge, 2);
                    builder.stamp_grid(0, 1, 2, trim_edge - 2);
                    LocalBounds::extent(trim_edge - 1, trim_edge - 1)
                }
                BlockKind::TrimQuadrant(quadrant) => {
                    stamp_quadrant(&mut builder, quadrant, trim_edge);
                    LocalBounds::extent(trim_edge - 1, trim_edge - 1)
                }
                BlockKind::DegenerateSeam(edge) => builder.stamp_seam(edge, seam_length),
            };
            ranges[kind.index()] = builder.finish_block(culling_range);
        }

        Self {
            size,
            vertices: builder.vertices.into(),
            indices: builder.indices.into(),
            ranges,
        }
    }

    /// Block size the templates were built for.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Shared vertex buffer.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &Arc<[[u8; 2]]> {
        &self.vertices
    }

    /// Shared index buffer.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &Arc<[u16]> {
        &self.indices
    }

    /// Index range and culling bounds of one template.
    #[inline]
    #[must_use]
    pub const fn range(&self, kind: BlockKind) -> BlockRange {
        self.ranges[kind.index()]
    }

    /// Indices of one template.
    #[must_use]
    pub fn block_indices(&self, kind: BlockKind) -> &[u16] {
        let range = self.range(kind).index_range();
        &self.indices[range.start as usize..range.end as usize]
    }
}

fn stamp_quadrant(builder: &mut Builder, quadrant: Quadrant, edge: u32) {
    let far = edge - 2;
    // Full-height column on one side, the rest of the row on the other
    let column_x = if quadrant.is_left() { 0 } else { far };
    let row_y = if quadrant.is_top() { 0 } else { far };
    let row_x = if quadrant.is_left() { 1 } else { 0 };

    builder.stamp_grid(column_x, 0, 2, edge);
    builder.stamp_grid(row_x, row_y, edge - 1, 2);
}

#[derive(Default)]
struct Builder {
    vertices: Vec<[u8; 2]>,
    indices: Vec<u16>,
    block_start: usize,
}

impl Builder {
    fn begin_block(&mut self) {
        self.block_start = self.indices.len();
    }

    fn finish_block(&mut self, culling_range: LocalBounds) -> BlockRange {
        BlockRange {
            index_offset: self.block_start as u32,
            index_count: (self.indices.len() - self.block_start) as u32,
            culling_range,
        }
    }

    fn push_vertex(&mut self, x: u32, y: u32) {
        self.vertices.push([x as u8, y as u8]);
    }

    /// Joins the next strip of the current block to the previous one.
    fn bridge_to(&mut self, first: u16) {
        let Some(&last) = self.indices[self.block_start..].last() else {
            return;
        };
        self.indices.push(last);
        if (self.indices.len() - self.block_start) % 2 == 0 {
            self.indices.push(last);
        }
        self.indices.push(first);
    }

    /// Stamps a `width x height` vertex grid with its origin at `(x0, y0)`.
    fn stamp_grid(&mut self, x0: u32, y0: u32, width: u32, height: u32) {
        debug_assert!(width >= 2 && height >= 2);

        let base = self.vertices.len() as u16;
        for y in 0..height {
            for x in 0..width {
                self.push_vertex(x0 + x, y0 + y);
            }
        }
        self.bridge_to(base);

        let w = width as i32;
        let mut pos = 0i32;
        for z in 0..height - 1 {
            let step_even = w;
            let step_odd = (if z & 1 == 1 { -1 } else { 1 }) - w;
            for x in 0..2 * w - 1 {
                self.indices.push(base + pos as u16);
                pos += if x & 1 == 1 { step_odd } else { step_even };
            }
        }
        self.indices.push(base + pos as u16);
    }

    /// Stamps zero-area triangles `(2k, 2k+1, 2k+2)` along a line of
    /// `length` vertices starting at the local origin. Two instances cover
    /// one frame edge.
    fn stamp_seam(&mut self, edge: Edge, length: u32) -> LocalBounds {
        let far = length - 1;
        let base = self.vertices.len() as u16;
        for i in 0..length {
            // Left and bottom walk backwards to keep outward winding
            let (x, y) = match edge {
                Edge::Left => (0, far - i),
                Edge::Right => (0, i),
                Edge::Top => (i, 0),
                Edge::Bottom => (far - i, 0),
            };
            self.push_vertex(x, y);
        }

        let triangles = far / 2;
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        for k in 1..triangles as u16 {
            let v = base + 2 * k;
            // The repeated vertex keeps each triangle on an even position
            self.indices.extend_from_slice(&[v, v, v + 1, v + 2]);
        }

        match edge {
            Edge::Left | Edge::Right => LocalBounds::extent(0, far),
            Edge::Top | Edge::Bottom => LocalBounds::extent(far, 0),
        }
    }
}
