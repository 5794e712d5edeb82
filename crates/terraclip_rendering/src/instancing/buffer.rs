//! Instance buffer management for batched drawing.
//!
//! Pre-allocates the whole frame's instance storage to avoid runtime
//! allocations. Batches are arena ranges, so the buffer can be uploaded as
//! one contiguous block.

use terraclip_core::{ArenaRange, InstanceArena};

use super::instance_data::InstanceParams;
use crate::clipmap::BlockKind;
use crate::error::TerrainResult;

/// All visible instances of one block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    /// Block template the batch draws.
    pub kind: BlockKind,
    /// Instances of the batch inside the instance buffer.
    pub instances: ArenaRange,
    /// Byte offset of the first instance in the uploaded buffer.
    pub uniform_buffer_offset: usize,
}

impl DrawBatch {
    /// Number of instances in the batch.
    #[inline]
    #[must_use]
    pub const fn instance_count(&self) -> usize {
        self.instances.len
    }
}

/// A batch being filled. Hand it back to `InstanceBuffer::end_batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingBatch {
    kind: BlockKind,
    /// Write position before alignment padding.
    mark: usize,
    /// Aligned start of the batch.
    start: usize,
}

/// Fixed-capacity instance storage with per-kind batches.
///
/// ## Usage
///
/// ```rust,ignore
/// buffer.begin_frame();
/// for kind in BlockKind::ALL {
///     let pending = buffer.begin_batch(kind)?;
///     buffer.push(params)?;
///     buffer.end_batch(pending);
/// }
/// backend.upload_instances(buffer.as_bytes());
/// ```
#[derive(Debug)]
pub struct InstanceBuffer {
    /// Instance storage.
    arena: InstanceArena<InstanceParams>,
    /// Batch start alignment, in instances.
    alignment: usize,
    /// Batches of the current frame, in kind order.
    batches: Vec<DrawBatch>,
}

impl InstanceBuffer {
    /// Creates a buffer holding `capacity` instances with batch starts
    /// aligned to `alignment` instances.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is zero.
    #[must_use]
    pub fn new(capacity: usize, alignment: usize) -> Self {
        assert!(alignment > 0, "batch alignment must be non-zero");
        Self {
            arena: InstanceArena::new(capacity),
            alignment,
            batches: Vec::with_capacity(BlockKind::COUNT),
        }
    }

    /// Begins a new frame, dropping the previous frame's instances.
    pub fn begin_frame(&mut self) {
        self.arena.reset();
        self.batches.clear();
    }

    /// Starts a batch for `kind` at the next aligned position.
    ///
    /// # Errors
    ///
    /// Returns `InstanceCapacityExceeded` if the padding does not fit.
    pub fn begin_batch(&mut self, kind: BlockKind) -> TerrainResult<PendingBatch> {
        let mark = self.arena.len();
        let start = self.arena.align_to(self.alignment)?;
        Ok(PendingBatch { kind, mark, start })
    }

    /// Adds an instance to the open batch.
    ///
    /// # Errors
    ///
    /// Returns `InstanceCapacityExceeded` if the buffer is full.
    #[inline]
    pub fn push(&mut self, instance: InstanceParams) -> TerrainResult<()> {
        self.arena.push(instance)?;
        Ok(())
    }

    /// Closes a batch. Empty batches are dropped along with their padding.
    pub fn end_batch(&mut self, pending: PendingBatch) -> Option<DrawBatch> {
        let instances = self.arena.range_from(pending.start);
        if instances.is_empty() {
            self.arena.truncate(pending.mark);
            return None;
        }

        let batch = DrawBatch {
            kind: pending.kind,
            instances,
            uniform_buffer_offset: pending.start * InstanceParams::SIZE,
        };
        self.batches.push(batch);
        Some(batch)
    }

    /// Batches of the current frame.
    #[inline]
    #[must_use]
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// Instances of one batch.
    #[inline]
    #[must_use]
    pub fn instances(&self, batch: &DrawBatch) -> &[InstanceParams] {
        self.arena.slice(batch.instances)
    }

    /// Number of instances written this frame, padding included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if nothing was written this frame.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Instance capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// The frame's instances as bytes for GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.arena.as_bytes()
    }
}
