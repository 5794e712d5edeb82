//! # Instance Arena
//!
//! A bump arena of `Copy` elements that is filled during a frame and
//! released all at once. Batches are described by `ArenaRange` (offset +
//! length), so nothing outside the arena ever holds a reference into it.

use thiserror::Error;

/// The arena has no room for the requested elements.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("arena full: capacity {capacity}, required {required}")]
pub struct ArenaFull {
    /// Total element capacity.
    pub capacity: usize,
    /// Element count the failed request needed.
    pub required: usize,
}

/// A contiguous run of elements inside an arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaRange {
    /// Index of the first element.
    pub offset: usize,
    /// Number of elements.
    pub len: usize,
}

impl ArenaRange {
    /// Returns true if the range holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last element.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// A bump arena for per-frame instance data.
///
/// Capacity is fixed at construction and never grows: a push past the end
/// fails with `ArenaFull` instead of reallocating.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena: InstanceArena<u32> = InstanceArena::new(64);
///
/// let start = arena.align_to(4)?;
/// arena.push(7)?;
/// arena.push(9)?;
/// let batch = arena.range_from(start);
/// assert_eq!(arena.slice(batch), &[7, 9]);
///
/// // Next frame
/// arena.reset();
/// ```
#[derive(Debug)]
pub struct InstanceArena<T> {
    /// Backing storage, reserved once.
    storage: Vec<T>,
    /// Total element capacity.
    capacity: usize,
}

impl<T: Copy + Default> InstanceArena<T> {
    /// Creates an arena able to hold `capacity` elements.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the element capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of elements written this frame (padding included).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if nothing has been written since the last reset.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Releases every element. Keeps the reservation.
    #[inline]
    pub fn reset(&mut self) {
        self.storage.clear();
    }

    /// Drops everything written after `len`. No-op if `len` is past the end.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.storage.truncate(len);
    }

    /// Pads with default elements until the write position is a multiple of
    /// `alignment`, and returns that position.
    ///
    /// # Errors
    ///
    /// Returns `ArenaFull` if the padding does not fit.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is zero.
    pub fn align_to(&mut self, alignment: usize) -> Result<usize, ArenaFull> {
        assert!(alignment > 0, "alignment must be non-zero");
        let len = self.storage.len();
        let aligned = len.div_ceil(alignment) * alignment;
        if aligned > self.capacity {
            return Err(ArenaFull {
                capacity: self.capacity,
                required: aligned,
            });
        }
        self.storage.resize(aligned, T::default());
        Ok(aligned)
    }

    /// Appends one element and returns its index.
    ///
    /// # Errors
    ///
    /// Returns `ArenaFull` if the arena is at capacity.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<usize, ArenaFull> {
        let index = self.storage.len();
        if index >= self.capacity {
            return Err(ArenaFull {
                capacity: self.capacity,
                required: index + 1,
            });
        }
        self.storage.push(item);
        Ok(index)
    }

    /// Returns the range from `offset` to the current write position.
    #[inline]
    #[must_use]
    pub fn range_from(&self, offset: usize) -> ArenaRange {
        ArenaRange {
            offset,
            len: self.storage.len().saturating_sub(offset),
        }
    }

    /// Returns the elements of `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range lies outside the written part of the arena.
    #[inline]
    #[must_use]
    pub fn slice(&self, range: ArenaRange) -> &[T] {
        &self.storage[range.offset..range.end()]
    }

    /// Returns everything written this frame.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }
}

impl<T: bytemuck::Pod + Default> InstanceArena<T> {
    /// Returns everything written this frame as bytes for GPU upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.storage)
    }
}
