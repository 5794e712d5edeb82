//! Upload staging for recomputed texel rectangles.
//!
//! Rectangles are written into the current frame's half of a
//! `FrameDoubleBuffer` and queued. `flush` hands each queued rectangle to
//! the backend. The other half may still be read by the previous frame's
//! uploads, so a half is only rewritten after the frame that last filled
//! it is known to be done.

use terraclip_core::{ArenaRange, FrameDoubleBuffer};

use super::window::{HeightTexel, TexelRect};
use crate::backend::UploadSink;
use crate::error::{TerrainError, TerrainResult};

/// One queued sub-region upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRegion {
    /// Texture array layer.
    pub level: u32,
    /// Texel rectangle within the layer.
    pub rect: TexelRect,
    /// Row-major texels of the rectangle inside the staging buffer.
    pub data: ArenaRange,
}

/// Totals of one `flush`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Sub-region uploads issued.
    pub regions: u32,
    /// Texels uploaded.
    pub texels: u64,
}

/// `OutOfMemory` for a failed reservation of `texels` texels. Saturates
/// for requests past the address space.
pub(crate) const fn out_of_memory(texels: usize) -> TerrainError {
    TerrainError::OutOfMemory {
        bytes: texels.saturating_mul(HeightTexel::SIZE),
    }
}

/// Reserves `additional` texels in `staging`, reporting failure as
/// `OutOfMemory`.
pub(crate) fn reserve_texels(staging: &mut Vec<HeightTexel>, additional: usize) -> TerrainResult<()> {
    staging.try_reserve(additional).map_err(|_| out_of_memory(additional))
}

/// Double-buffered staging plus the queue of pending regions.
#[derive(Debug)]
pub struct UploadQueue {
    staging: FrameDoubleBuffer<Vec<HeightTexel>>,
    regions: Vec<UploadRegion>,
}

impl UploadQueue {
    /// Creates a queue whose staging halves each hold `texels` texels
    /// without reallocating.
    ///
    /// # Errors
    ///
    /// Returns `OutOfMemory` if the staging memory cannot be reserved.
    pub fn with_capacity(texels: usize, regions: usize) -> TerrainResult<Self> {
        let mut first = Vec::new();
        let mut second = Vec::new();
        reserve_texels(&mut first, texels)?;
        reserve_texels(&mut second, texels)?;

        Ok(Self {
            staging: FrameDoubleBuffer::new(first, second),
            regions: Vec::with_capacity(regions),
        })
    }

    /// Switches to the other staging half for `frame` and clears it.
    ///
    /// Returns the frame that last filled that half; its uploads must have
    /// completed before anything is staged.
    pub fn begin_frame(&mut self, frame: u64) -> Option<u64> {
        let previous = self.staging.begin_frame(frame);
        self.staging.write().clear();
        self.regions.clear();
        previous
    }

    /// Opens a region and returns the staging vector to append its texels
    /// to, row by row.
    pub(crate) fn stage(
        &mut self,
        level: u32,
        rect: TexelRect,
    ) -> TerrainResult<(&mut Vec<HeightTexel>, usize)> {
        let staging = self.staging.write();
        reserve_texels(staging, rect.area())?;
        let offset = staging.len();
        self.regions.push(UploadRegion {
            level,
            rect,
            data: ArenaRange {
                offset,
                len: rect.area(),
            },
        });
        Ok((staging, offset))
    }

    /// Regions waiting for `flush`.
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[UploadRegion] {
        &self.regions
    }

    /// Staged texels of a queued region.
    #[must_use]
    pub fn region_data(&self, region: &UploadRegion) -> &[HeightTexel] {
        &self.staging.current()[region.data.offset..region.data.end()]
    }

    /// Issues one `upload_region` per queued region and empties the queue.
    pub fn flush<U: UploadSink + ?Sized>(&mut self, sink: &mut U) -> FlushSummary {
        let mut summary = FlushSummary::default();
        let staging = self.staging.current();

        for region in &self.regions {
            let rect = region.rect;
            tracing::trace!(
                level = region.level,
                x = rect.x,
                y = rect.y,
                width = rect.width,
                height = rect.height,
                "uploading height region"
            );
            sink.upload_region(
                region.level,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                &staging[region.data.offset..region.data.end()],
            );
            summary.regions += 1;
            summary.texels += region.data.len as u64;
        }

        self.regions.clear();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        calls: Vec<(u32, u32, u32, u32, u32, usize)>,
        waited: Vec<u64>,
    }

    impl UploadSink for CountingSink {
        fn upload_region(&mut self, level: u32, x: u32, y: u32, width: u32, height: u32, data: &[HeightTexel]) {
            self.calls.push((level, x, y, width, height, data.len()));
        }

        fn wait_for_frame(&mut self, frame: u64) {
            self.waited.push(frame);
        }
    }

    fn rect(x: u32, y: u32, width: u32, height: u32) -> TexelRect {
        TexelRect { x, y, width, height }
    }

    #[test]
    fn test_stage_and_flush() {
        let mut queue = UploadQueue::with_capacity(64, 4).unwrap();
        queue.begin_frame(1);

        let (staging, offset) = queue.stage(2, rect(0, 0, 2, 3)).unwrap();
        assert_eq!(offset, 0);
        staging.extend(std::iter::repeat(HeightTexel::default()).take(6));

        let mut sink = CountingSink::default();
        let summary = queue.flush(&mut sink);

        assert_eq!(summary, FlushSummary { regions: 1, texels: 6 });
        assert_eq!(sink.calls, vec![(2, 0, 0, 2, 3, 6)]);
        assert!(queue.regions().is_empty());
    }

    #[test]
    fn test_begin_frame_reports_reused_half() {
        let mut queue = UploadQueue::with_capacity(16, 4).unwrap();
        assert_eq!(queue.begin_frame(1), None);
        assert_eq!(queue.begin_frame(2), None);
        assert_eq!(queue.begin_frame(3), Some(1));
    }

    #[test]
    fn test_region_data_points_into_staging() {
        let mut queue = UploadQueue::with_capacity(16, 4).unwrap();
        queue.begin_frame(1);
        let (staging, _) = queue.stage(0, rect(0, 0, 1, 1)).unwrap();
        staging.push(HeightTexel {
            height: 1.0,
            coarse_height: 2.0,
        });
        let (staging, offset) = queue.stage(0, rect(1, 0, 1, 1)).unwrap();
        assert_eq!(offset, 1);
        staging.push(HeightTexel {
            height: 3.0,
            coarse_height: 4.0,
        });

        let second = queue.regions()[1];
        assert_eq!(queue.region_data(&second)[0].height, 3.0);
    }

    #[test]
    fn test_impossible_reservation_is_out_of_memory() {
        let mut staging = Vec::new();
        let err = reserve_texels(&mut staging, usize::MAX / 2).unwrap_err();
        assert_eq!(err, TerrainError::OutOfMemory { bytes: usize::MAX });
        assert!(staging.is_empty());
    }

    #[test]
    fn test_out_of_memory_reports_exact_bytes() {
        assert_eq!(
            out_of_memory(10),
            TerrainError::OutOfMemory {
                bytes: 10 * HeightTexel::SIZE
            }
        );
        assert_eq!(out_of_memory(usize::MAX), TerrainError::OutOfMemory { bytes: usize::MAX });
    }
}
