//! # Height Field
//!
//! One toroidal `window_size x window_size` texel window per clipmap level.
//! When a level's offset moves, only the texels that enter the window are
//! recomputed and queued for upload:
//!
//! ```text
//!   old window        new window (moved right and down)
//!  ┌──────────┐       ┌────┬─────┐
//!  │          │       │kept│ X   │   X: full-height band of new columns
//!  │          │  ──►  ├────┤ band│   Y: full-width band of new rows
//!  │          │       │ Y band   │   the corner is covered by both
//!  └──────────┘       └──────────┘
//! ```
//!
//! Large moves, and windows marked dirty, rebuild the whole level as up to
//! four quadrants split at the toroidal seam.
//!
//! Each texel carries the level's own height and the height the next
//! coarser level interpolates to at that spot, so the vertex stage can
//! blend towards the coarser level near a ring's outer edge.

mod bands;
mod upload;
mod window;

pub use bands::{classify, seam_spans, BandLayout, Span};
pub use upload::{FlushSummary, UploadQueue, UploadRegion};
pub use window::{HeightTexel, HeightWindow, TexelRect};

use terraclip_core::{HeightSource, IVec2, LevelSampler};

use crate::backend::UploadSink;
use crate::config::TerrainContext;
use crate::error::{TerrainError, TerrainResult};

/// What `update_level` did to one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUpdate {
    /// The window did not move and was not dirty.
    Unchanged,
    /// Only the entering bands were recomputed.
    Incremental {
        /// Rectangles queued.
        regions: u32,
    },
    /// The whole window was recomputed.
    FullRebuild {
        /// Rectangles queued.
        regions: u32,
    },
}

impl LevelUpdate {
    /// Rectangles queued by the update.
    #[must_use]
    pub const fn regions(self) -> u32 {
        match self {
            Self::Unchanged => 0,
            Self::Incremental { regions } | Self::FullRebuild { regions } => regions,
        }
    }
}

/// Totals of one `update` over every level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Levels rebuilt completely.
    pub full_rebuilds: u32,
    /// Levels updated band by band.
    pub incremental_updates: u32,
    /// Rectangles queued.
    pub regions: u32,
}

/// Per-level toroidal height windows over a `HeightSource`.
pub struct HeightField<S> {
    source: S,
    levels: u32,
    window_size: u32,
    windows: Vec<HeightWindow>,
    /// CPU copy of the texture array, `levels` layers of `window_size²`.
    texels: Vec<HeightTexel>,
    uploads: UploadQueue,
}

impl<S: HeightSource> HeightField<S> {
    /// Creates a field whose windows are all dirty, so the first update
    /// rebuilds every level.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the source period is not positive, `OutOfMemory`
    /// if the texel mirror or staging cannot be reserved.
    pub fn new(context: &TerrainContext, source: S) -> TerrainResult<Self> {
        let levels = context.levels();
        let window_size = context.config().window_size();

        let period = source.period();
        if period <= 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "height source period {period} must be positive"
            )));
        }
        let coarsest_footprint = i64::from(window_size) << (levels - 1);
        if i64::from(period) < coarsest_footprint {
            tracing::warn!(
                period,
                coarsest_footprint,
                "height source repeats inside the coarsest level's window"
            );
        }

        let layer = (window_size * window_size) as usize;
        let total = layer * levels as usize;

        let mut texels = Vec::new();
        texels
            .try_reserve_exact(total)
            .map_err(|_| upload::out_of_memory(total))?;
        texels.resize(total, HeightTexel::default());

        // A frame's uploads never exceed a full rebuild of every level
        let uploads = UploadQueue::with_capacity(total, 4 * levels as usize)?;

        tracing::info!(
            levels,
            window_size,
            period,
            staging_bytes = 2 * total * HeightTexel::SIZE,
            "created height field"
        );

        Ok(Self {
            source,
            levels,
            window_size,
            windows: vec![HeightWindow::new(); levels as usize],
            texels,
            uploads,
        })
    }

    /// The height function.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Number of levels.
    #[inline]
    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.levels
    }

    /// Texels along one window edge.
    #[inline]
    #[must_use]
    pub const fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Window state of `level`.
    #[inline]
    #[must_use]
    pub fn window(&self, level: u32) -> &HeightWindow {
        &self.windows[level as usize]
    }

    /// Texels of one layer, row-major, indexed by toroidal texel position.
    #[must_use]
    pub fn texels(&self, level: u32) -> &[HeightTexel] {
        let layer = (self.window_size * self.window_size) as usize;
        let start = layer * level as usize;
        &self.texels[start..start + layer]
    }

    /// Texel holding logical sample `l` of `level`, if the window covers it.
    #[must_use]
    pub fn texel_at_logical(&self, level: u32, l: IVec2) -> Option<HeightTexel> {
        let window = self.window(level);
        if window.dirty || !window.contains(l, self.window_size) {
            return None;
        }
        let [x, y] = HeightWindow::texel(l, self.window_size);
        Some(self.texels(level)[(y * self.window_size + x) as usize])
    }

    /// Rectangles queued since the last `flush`.
    #[inline]
    #[must_use]
    pub fn pending_regions(&self) -> &[UploadRegion] {
        self.uploads.regions()
    }

    /// Staged texels of a pending rectangle.
    #[inline]
    #[must_use]
    pub fn region_data(&self, region: &UploadRegion) -> &[HeightTexel] {
        self.uploads.region_data(region)
    }

    /// Marks every window dirty; the next update rebuilds all levels.
    pub fn invalidate(&mut self) {
        tracing::debug!(levels = self.levels, "invalidating height windows");
        for window in &mut self.windows {
            window.dirty = true;
        }
    }

    /// Starts `frame`: claims a staging buffer, first waiting on `sink` for
    /// the frame that last used it.
    pub fn begin_frame<U: UploadSink + ?Sized>(&mut self, frame: u64, sink: &mut U) {
        if let Some(previous) = self.uploads.begin_frame(frame) {
            sink.wait_for_frame(previous);
        }
    }

    /// Hands every queued rectangle to `sink`.
    pub fn flush<U: UploadSink + ?Sized>(&mut self, sink: &mut U) -> FlushSummary {
        self.uploads.flush(sink)
    }

    /// Runs `update_level` for every level.
    ///
    /// # Errors
    ///
    /// Propagates the first `update_level` failure.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` does not have one entry per level.
    pub fn update(&mut self, offsets: &[IVec2]) -> TerrainResult<UpdateSummary> {
        assert_eq!(
            offsets.len(),
            self.levels as usize,
            "expected one offset per height level"
        );

        let mut summary = UpdateSummary::default();
        for (level, &offset) in (0..self.levels).zip(offsets) {
            match self.update_level(level, offset)? {
                LevelUpdate::Unchanged => {}
                LevelUpdate::Incremental { regions } => {
                    summary.incremental_updates += 1;
                    summary.regions += regions;
                }
                LevelUpdate::FullRebuild { regions } => {
                    summary.full_rebuilds += 1;
                    summary.regions += regions;
                }
            }
        }
        Ok(summary)
    }

    /// Moves `level`'s window to `target_offset` (level-0 grid units) and
    /// queues the texels that changed.
    ///
    /// # Errors
    ///
    /// `OutOfMemory` if staging cannot grow. The window is left dirty so a
    /// later update rebuilds it.
    pub fn update_level(&mut self, level: u32, target_offset: IVec2) -> TerrainResult<LevelUpdate> {
        let index = level as usize;
        let target = target_offset >> level;
        let old = self.windows[index];

        if !old.dirty && old.top_left() == target {
            return Ok(LevelUpdate::Unchanged);
        }

        let w = self.window_size;
        let dx = i64::from(target.x) - i64::from(old.top_left_x);
        let dy = i64::from(target.y) - i64::from(old.top_left_y);
        let teleport = dx.abs() >= i64::from(w) || dy.abs() >= i64::from(w);

        self.windows[index] = HeightWindow {
            top_left_x: target.x,
            top_left_y: target.y,
            dirty: true,
        };

        let result = if old.dirty || teleport {
            self.rebuild_level(level, target)
        } else {
            self.shift_level(level, old.top_left(), target, dx, dy)
        };

        match result {
            Ok(update) => {
                self.windows[index].dirty = false;
                Ok(update)
            }
            Err(err) => {
                tracing::warn!(level, %err, "height update failed, level stays dirty");
                Err(err)
            }
        }
    }

    fn rebuild_level(&mut self, level: u32, target: IVec2) -> TerrainResult<LevelUpdate> {
        let w = self.window_size;
        let [sx, sy] = HeightWindow::texel(target, w);
        tracing::debug!(level, x = target.x, y = target.y, "full height rebuild");

        let mut regions = 0;
        for ys in seam_spans(sy, w).into_iter().flatten() {
            for xs in seam_spans(sx, w).into_iter().flatten() {
                self.fill(
                    level,
                    TexelRect {
                        x: xs.start,
                        y: ys.start,
                        width: xs.len,
                        height: ys.len,
                    },
                )?;
                regions += 1;
            }
        }
        Ok(LevelUpdate::FullRebuild { regions })
    }

    fn shift_level(
        &mut self,
        level: u32,
        old: IVec2,
        target: IVec2,
        dx: i64,
        dy: i64,
    ) -> TerrainResult<LevelUpdate> {
        let w = self.window_size;
        let [old_x, old_y] = HeightWindow::texel(old, w);
        let [new_x, new_y] = HeightWindow::texel(target, w);

        let axis = |old_s: u32, new_s: u32, delta: i64| {
            let wrap_delta = new_s as i32 - old_s as i32;
            classify(wrap_delta, delta.signum() as i32)
        };
        let layout_x = axis(old_x, new_x, dx);
        let layout_y = axis(old_y, new_y, dy);

        if layout_x == BandLayout::Rebuild || layout_y == BandLayout::Rebuild {
            return self.rebuild_level(level, target);
        }

        tracing::debug!(level, dx, dy, ?layout_x, ?layout_y, "incremental height update");

        let mut regions = 0;
        for span in layout_x.spans(old_x, new_x, w).into_iter().flatten() {
            self.fill(
                level,
                TexelRect {
                    x: span.start,
                    y: 0,
                    width: span.len,
                    height: w,
                },
            )?;
            regions += 1;
        }
        for span in layout_y.spans(old_y, new_y, w).into_iter().flatten() {
            self.fill(
                level,
                TexelRect {
                    x: 0,
                    y: span.start,
                    width: w,
                    height: span.len,
                },
            )?;
            regions += 1;
        }
        Ok(LevelUpdate::Incremental { regions })
    }

    fn fill(&mut self, level: u32, rect: TexelRect) -> TerrainResult<()> {
        let window = self.windows[level as usize];
        let layer = (self.window_size * self.window_size) as usize;
        let start = layer * level as usize;
        fill_rect(
            &LevelSampler::new(&self.source, level),
            &window,
            self.window_size,
            level,
            rect,
            &mut self.uploads,
            &mut self.texels[start..start + layer],
        )
    }
}

/// Samples `rect` of one level into staging and the texel mirror.
fn fill_rect<S: HeightSource + ?Sized>(
    sampler: &LevelSampler<'_, S>,
    window: &HeightWindow,
    window_size: u32,
    level: u32,
    rect: TexelRect,
    uploads: &mut UploadQueue,
    layer: &mut [HeightTexel],
) -> TerrainResult<()> {
    tracing::trace!(
        level,
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "filling height region"
    );

    let (staging, _) = uploads.stage(level, rect)?;
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let l = window.logical(x, y, window_size);
            let texel = HeightTexel {
                height: sampler.height(l.x, l.y),
                coarse_height: sampler.coarse_height(l.x, l.y),
            };
            staging.push(texel);
            layer[(y * window_size + x) as usize] = texel;
        }
    }
    Ok(())
}

impl<S> std::fmt::Debug for HeightField<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField")
            .field("levels", &self.levels)
            .field("window_size", &self.window_size)
            .field("windows", &self.windows)
            .field("pending_regions", &self.uploads.regions().len())
            .finish_non_exhaustive()
    }
}
