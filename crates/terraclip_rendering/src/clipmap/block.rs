//! Block templates shared by every clipmap level.

/// Corner of a level's hole that the finer level leaves uncovered, named
/// by the two sides of the L-shaped trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Trim along the top and right sides.
    TopRight,
    /// Trim along the top and left sides.
    TopLeft,
    /// Trim along the bottom and right sides.
    BottomRight,
    /// Trim along the bottom and left sides.
    BottomLeft,
}

impl Quadrant {
    /// Every quadrant, in template order.
    pub const ALL: [Self; 4] = [Self::TopRight, Self::TopLeft, Self::BottomRight, Self::BottomLeft];

    /// Whether the trim runs along the top (low Z) side.
    #[inline]
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopRight | Self::TopLeft)
    }

    /// Whether the trim runs along the left (low X) side.
    #[inline]
    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }
}

/// Outer edge of a level frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Low X edge.
    Left,
    /// High X edge.
    Right,
    /// Low Z edge.
    Top,
    /// High Z edge.
    Bottom,
}

impl Edge {
    /// Every edge, in template order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];
}

/// One static geometry template, instanced across levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `size x size` grid; twelve per ring, sixteen at level 0.
    MainBlock,
    /// `3 x size` strip closing the column gap of a ring.
    RingFixupVertical,
    /// `size x 3` strip closing the row gap of a ring.
    RingFixupHorizontal,
    /// One-cell ring between level 0 and level 1.
    TrimFull,
    /// L-shaped one-cell trim between a level and the next finer one.
    TrimQuadrant(Quadrant),
    /// Zero-area triangles along a frame edge hiding T-junctions against
    /// the coarser level.
    DegenerateSeam(Edge),
}

impl BlockKind {
    /// Number of templates.
    pub const COUNT: usize = 12;

    /// Every template, in index-buffer and batch order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MainBlock,
        Self::RingFixupVertical,
        Self::RingFixupHorizontal,
        Self::TrimFull,
        Self::TrimQuadrant(Quadrant::TopRight),
        Self::TrimQuadrant(Quadrant::TopLeft),
        Self::TrimQuadrant(Quadrant::BottomRight),
        Self::TrimQuadrant(Quadrant::BottomLeft),
        Self::DegenerateSeam(Edge::Left),
        Self::DegenerateSeam(Edge::Right),
        Self::DegenerateSeam(Edge::Top),
        Self::DegenerateSeam(Edge::Bottom),
    ];

    /// Position of the template in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::MainBlock => 0,
            Self::RingFixupVertical => 1,
            Self::RingFixupHorizontal => 2,
            Self::TrimFull => 3,
            Self::TrimQuadrant(Quadrant::TopRight) => 4,
            Self::TrimQuadrant(Quadrant::TopLeft) => 5,
            Self::TrimQuadrant(Quadrant::BottomRight) => 6,
            Self::TrimQuadrant(Quadrant::BottomLeft) => 7,
            Self::DegenerateSeam(Edge::Left) => 8,
            Self::DegenerateSeam(Edge::Right) => 9,
            Self::DegenerateSeam(Edge::Top) => 10,
            Self::DegenerateSeam(Edge::Bottom) => 11,
        }
    }
}

/// Local box, in vertex units, that a template's vertices occupy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalBounds {
    /// Smallest local vertex coordinate.
    pub min: [u32; 2],
    /// Largest local vertex coordinate.
    pub max: [u32; 2],
}

impl LocalBounds {
    /// Bounds from the origin to `max`.
    #[must_use]
    pub const fn extent(max_x: u32, max_y: u32) -> Self {
        Self {
            min: [0, 0],
            max: [max_x, max_y],
        }
    }
}

/// Where a template lives in the shared index buffer, plus its bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRange {
    /// First index of the template.
    pub index_offset: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Local vertex box used for culling.
    pub culling_range: LocalBounds,
}

impl BlockRange {
    /// Index range for a draw call.
    #[inline]
    #[must_use]
    pub const fn index_range(&self) -> std::ops::Range<u32> {
        self.index_offset..self.index_offset + self.index_count
    }
}
