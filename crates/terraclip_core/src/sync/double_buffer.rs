//! # Frame Double Buffer
//!
//! Two slots that alternate every frame. Each slot remembers the frame that
//! last wrote it, so the caller knows which frame must have finished
//! consuming it before it can be written again.
//!
//! ## Architecture
//!
//! ```text
//!          ┌────────────────────────────┐
//!          │     FrameDoubleBuffer      │
//!          │  ┌────────┐   ┌────────┐   │
//!          │  │ Slot 0 │   │ Slot 1 │   │
//!          │  │ frame  │   │ frame  │   │
//!          │  └────────┘   └────────┘   │
//!          │   write_index (0/1)        │
//!          └────────────────────────────┘
//! ```

/// Two frame-alternating slots with per-slot frame tracking.
///
/// ## Usage
///
/// ```rust,ignore
/// let mut staging = FrameDoubleBuffer::new(Vec::new(), Vec::new());
///
/// loop {
///     if let Some(previous) = staging.begin_frame(frame) {
///         gpu.wait_for_frame(previous);
///     }
///     staging.write().clear();
///     // fill staging.write() ...
///     frame += 1;
/// }
/// ```
#[derive(Debug)]
pub struct FrameDoubleBuffer<T> {
    /// The two slots.
    slots: [T; 2],
    /// Frame that last acquired each slot.
    last_frame: [Option<u64>; 2],
    /// Slot currently being written.
    write_index: usize,
    /// Frame passed to the latest `begin_frame`.
    frame: Option<u64>,
}

impl<T> FrameDoubleBuffer<T> {
    /// Creates a double buffer from two initial slot values.
    #[must_use]
    pub fn new(first: T, second: T) -> Self {
        Self {
            slots: [first, second],
            last_frame: [None, None],
            // First begin_frame flips to slot 0
            write_index: 1,
            frame: None,
        }
    }

    /// Starts `frame`: switches to the other slot and claims it.
    ///
    /// Returns the frame that previously wrote the claimed slot, if any.
    /// That frame's consumers must be finished before the slot is written.
    ///
    /// # Panics
    ///
    /// Panics if `frame` does not advance past the previous frame.
    pub fn begin_frame(&mut self, frame: u64) -> Option<u64> {
        if let Some(current) = self.frame {
            assert!(frame > current, "frame {frame} does not advance past {current}");
        }
        self.write_index ^= 1;
        self.frame = Some(frame);
        self.last_frame[self.write_index].replace(frame)
    }

    /// Mutable access to the slot of the current frame.
    #[inline]
    pub fn write(&mut self) -> &mut T {
        &mut self.slots[self.write_index]
    }

    /// Shared access to the slot of the current frame.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &T {
        &self.slots[self.write_index]
    }
}

impl<T: Default> Default for FrameDoubleBuffer<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_alternate() {
        let mut buffer: FrameDoubleBuffer<Vec<u32>> = FrameDoubleBuffer::default();

        assert_eq!(buffer.begin_frame(0), None);
        buffer.write().push(10);

        assert_eq!(buffer.begin_frame(1), None);
        assert!(buffer.current().is_empty());
        buffer.write().push(20);

        // Back on the slot frame 0 filled
        assert_eq!(buffer.begin_frame(2), Some(0));
        assert_eq!(buffer.current(), &vec![10]);
    }

    #[test]
    fn test_reuse_reports_previous_writer() {
        let mut buffer: FrameDoubleBuffer<u8> = FrameDoubleBuffer::default();
        buffer.begin_frame(0);
        buffer.begin_frame(1);

        // Slot 0 was written in frame 0
        assert_eq!(buffer.begin_frame(2), Some(0));
        assert_eq!(buffer.begin_frame(3), Some(1));
    }

    #[test]
    #[should_panic(expected = "does not advance")]
    fn test_frame_must_advance() {
        let mut buffer: FrameDoubleBuffer<u8> = FrameDoubleBuffer::default();
        buffer.begin_frame(5);
        buffer.begin_frame(5);
    }
}
