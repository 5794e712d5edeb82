//! # Band Decision Table
//!
//! When a window moves by `delta` texels along one axis, the texels that
//! enter it form one band, or two if the band crosses the toroidal seam.
//! With `old_s` and `new_s` the old and new window origins reduced modulo
//! the window size, the band layout follows from two signs:
//!
//! ```text
//!                   delta < 0           delta == 0     delta > 0
//! wrap_delta < 0    Backward            Rebuild        ForwardWrapped
//! wrap_delta == 0   Rebuild             Stationary     Rebuild
//! wrap_delta > 0    BackwardWrapped     Rebuild        Forward
//!
//! wrap_delta = new_s - old_s
//! ```
//!
//! `Rebuild` cells are moves that cannot happen when `|delta|` is below the
//! window size; they fall back to a full rebuild.

/// How the entering texels of one axis are laid out in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandLayout {
    /// Nothing moved.
    Stationary,
    /// `[old_s, new_s)`.
    Forward,
    /// `[old_s, window)` and `[0, new_s)`.
    ForwardWrapped,
    /// `[new_s, old_s)`.
    Backward,
    /// `[new_s, window)` and `[0, old_s)`.
    BackwardWrapped,
    /// Not an incremental move.
    Rebuild,
}

const LAYOUT_TABLE: [[BandLayout; 3]; 3] = [
    [BandLayout::Backward, BandLayout::Rebuild, BandLayout::ForwardWrapped],
    [BandLayout::Rebuild, BandLayout::Stationary, BandLayout::Rebuild],
    [BandLayout::BackwardWrapped, BandLayout::Rebuild, BandLayout::Forward],
];

/// A run of texels along one axis of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First texel.
    pub start: u32,
    /// Number of texels.
    pub len: u32,
}

impl Span {
    /// Span over `[start, end)`; `None` when empty.
    #[inline]
    #[must_use]
    pub const fn between(start: u32, end: u32) -> Option<Self> {
        if end > start {
            Some(Self {
                start,
                len: end - start,
            })
        } else {
            None
        }
    }

    /// One past the last texel.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// Looks up the layout for a move.
#[must_use]
pub fn classify(wrap_delta: i32, delta: i32) -> BandLayout {
    let row = (wrap_delta.signum() + 1) as usize;
    let col = (delta.signum() + 1) as usize;
    LAYOUT_TABLE[row][col]
}

impl BandLayout {
    /// Spans of entering texels, given the old and new window origins
    /// reduced modulo `window`.
    #[must_use]
    pub fn spans(self, old_start: u32, new_start: u32, window: u32) -> [Option<Span>; 2] {
        match self {
            Self::Stationary | Self::Rebuild => [None, None],
            Self::Forward => [Span::between(old_start, new_start), None],
            Self::ForwardWrapped => [
                Span::between(old_start, window),
                Span::between(0, new_start),
            ],
            Self::Backward => [Span::between(new_start, old_start), None],
            Self::BackwardWrapped => [
                Span::between(new_start, window),
                Span::between(0, old_start),
            ],
        }
    }
}

/// Splits a whole axis at the toroidal seam: `[start, window)` then
/// `[0, start)`.
#[must_use]
pub fn seam_spans(start: u32, window: u32) -> [Option<Span>; 2] {
    [Span::between(start, window), Span::between(0, start)]
}
