//! # Clipmap Mesh
//!
//! Nested square rings of terrain geometry around the camera. Level 0 is a
//! solid 4x4 grid of blocks; every coarser level is a ring of twelve blocks
//! at twice the vertex spacing, closed against the finer level by fixup
//! strips, a trim, and zero-area seam triangles.
//!
//! ## Frame flow
//!
//! ```text
//! camera ──► level_offsets ──► (height field update)
//!                  │
//!                  ▼
//!          build_draw_list ──► cull each candidate ──► one batch per kind
//! ```
//!
//! All twelve templates live in one static vertex/index buffer built at
//! construction. Per frame only `InstanceParams` are produced.

mod block;
mod draw_list;
mod geometry;
mod offsets;

pub use block::{BlockKind, BlockRange, Edge, LocalBounds, Quadrant};
pub use draw_list::DrawList;
pub use geometry::{grid_index_count, ClipmapGeometry};
pub use offsets::{level_offset, trim_quadrant};

use terraclip_core::{IVec2, Vec2};

use crate::config::TerrainContext;
use crate::culling::{Aabb, FrustumCuller};
use crate::error::TerrainResult;
use crate::instancing::{InstanceBuffer, InstanceParams};

/// Geometry clipmap: static templates plus the per-frame draw list.
#[derive(Debug)]
pub struct ClipmapMesh {
    size: u32,
    levels: u32,
    clip_scale: f32,
    window_size: i32,
    cull_height: [f32; 2],
    geometry: ClipmapGeometry,
    instances: InstanceBuffer,
}

impl ClipmapMesh {
    /// Builds the static templates and reserves the instance buffer.
    #[must_use]
    pub fn new(context: &TerrainContext) -> Self {
        let config = context.config();
        let geometry = ClipmapGeometry::build(config.size);

        tracing::info!(
            size = config.size,
            levels = config.levels,
            vertices = geometry.vertices().len(),
            indices = geometry.indices().len(),
            instance_capacity = config.instance_capacity(),
            "built clipmap block templates"
        );

        Self {
            size: config.size,
            levels: config.levels,
            clip_scale: config.clip_scale,
            window_size: config.window_size() as i32,
            cull_height: [config.cull_height_min, config.cull_height_max],
            geometry,
            instances: InstanceBuffer::new(
                config.instance_capacity(),
                config.instance_alignment as usize,
            ),
        }
    }

    /// Number of levels.
    #[inline]
    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.levels
    }

    /// Static block templates.
    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &ClipmapGeometry {
        &self.geometry
    }

    /// Top-left corner of `level`'s frame for a camera at `camera` (world
    /// XZ), in level-0 grid units.
    #[inline]
    #[must_use]
    pub fn get_offset(&self, camera: Vec2, level: u32) -> IVec2 {
        level_offset(camera, level, self.size, self.clip_scale)
    }

    /// Offsets of every level.
    #[must_use]
    pub fn level_offsets(&self, camera: Vec2) -> Vec<IVec2> {
        let mut offsets = Vec::with_capacity(self.levels as usize);
        self.write_level_offsets(camera, &mut offsets);
        offsets
    }

    /// Offsets of every level, written into a reused vector.
    pub fn write_level_offsets(&self, camera: Vec2, out: &mut Vec<IVec2>) {
        out.clear();
        out.extend((0..self.levels).map(|level| self.get_offset(camera, level)));
    }

    /// Shader parameters for a block whose local origin is `local` on
    /// `level`, with that level at `offset`.
    #[must_use]
    pub fn instance_params(&self, offset: IVec2, local: IVec2, level: u32) -> InstanceParams {
        let origin = offset + (local << level);
        let texel = (offset >> level) + local;
        let inv_window = 1.0 / self.window_size as f32;

        InstanceParams {
            world_offset: [
                origin.x as f32 * self.clip_scale,
                origin.y as f32 * self.clip_scale,
            ],
            texture_scale: [inv_window, inv_window],
            texture_offset: [
                texel.x.rem_euclid(self.window_size) as f32 * inv_window,
                texel.y.rem_euclid(self.window_size) as f32 * inv_window,
            ],
            vertex_scale: self.clip_scale * (1u32 << level) as f32,
            level: level as f32,
        }
    }

    /// World-space box of an instance of `kind`.
    #[must_use]
    pub fn instance_bounds(&self, kind: BlockKind, params: &InstanceParams) -> Aabb {
        let range = self.geometry.range(kind).culling_range;
        let min = params.world_position(range.min.map(|v| v as f32));
        let max = params.world_position(range.max.map(|v| v as f32));

        Aabb::from_ground_rect([min[0], max[0]], [min[1], max[1]], self.cull_height)
    }

    /// Emits every visible instance, batched by block kind.
    ///
    /// `offsets` must hold one entry per level, as from `level_offsets`.
    ///
    /// # Errors
    ///
    /// Returns `InstanceCapacityExceeded` if the instances do not fit the
    /// buffer. Validated configurations never trigger this.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` does not have one entry per level.
    pub fn build_draw_list(
        &mut self,
        offsets: &[IVec2],
        culler: &FrustumCuller,
    ) -> TerrainResult<DrawList<'_>> {
        assert_eq!(
            offsets.len(),
            self.levels as usize,
            "expected one offset per clipmap level"
        );

        self.instances.begin_frame();
        let mut culled = 0u32;

        for kind in BlockKind::ALL {
            let pending = self.instances.begin_batch(kind)?;
            for level in 0..self.levels {
                let offset = offsets[level as usize];
                let spots = draw_list::placements(kind, level, offsets, self.size);
                for &local in spots.as_slice() {
                    let params = self.instance_params(offset, local, level);
                    if culler.is_visible(&self.instance_bounds(kind, &params)) {
                        self.instances.push(params)?;
                    } else {
                        culled += 1;
                    }
                }
            }
            if let Some(batch) = self.instances.end_batch(pending) {
                tracing::trace!(?kind, instances = batch.instance_count(), "batched block kind");
            }
        }

        Ok(DrawList::new(&self.geometry, &self.instances, culled))
    }
}
