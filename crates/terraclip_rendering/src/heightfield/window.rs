//! Toroidal texel windows.

use bytemuck::{Pod, Zeroable};
use terraclip_core::IVec2;

/// One texel of a level's height texture: two channels.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HeightTexel {
    /// Height at this level's resolution.
    pub height: f32,
    /// Height the next coarser level interpolates to here.
    pub coarse_height: f32,
}

impl HeightTexel {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Rectangle of texels inside one level's window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexelRect {
    /// Left texel.
    pub x: u32,
    /// Top texel.
    pub y: u32,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl TexelRect {
    /// Number of texels.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Which part of the infinite height field a level's window holds.
///
/// Texel `t` of the window holds logical sample `l` with
/// `t == l.rem_euclid(window_size)` and
/// `top_left <= l < top_left + window_size` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightWindow {
    /// Logical X of the window's first column.
    pub top_left_x: i32,
    /// Logical Y of the window's first row.
    pub top_left_y: i32,
    /// Forces a full rebuild on the next update.
    pub dirty: bool,
}

impl HeightWindow {
    /// A window that has never been filled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            top_left_x: 0,
            top_left_y: 0,
            dirty: true,
        }
    }

    /// Logical origin.
    #[inline]
    #[must_use]
    pub const fn top_left(&self) -> IVec2 {
        IVec2::new(self.top_left_x, self.top_left_y)
    }

    /// Logical coordinate held by texel `(x, y)`.
    #[inline]
    #[must_use]
    pub fn logical(&self, x: u32, y: u32, window_size: u32) -> IVec2 {
        let w = window_size as i32;
        let axis = |origin: i32, t: u32| origin + (t as i32 - origin.rem_euclid(w)).rem_euclid(w);
        IVec2::new(axis(self.top_left_x, x), axis(self.top_left_y, y))
    }

    /// Texel holding logical coordinate `l`.
    #[inline]
    #[must_use]
    pub fn texel(l: IVec2, window_size: u32) -> [u32; 2] {
        let w = window_size as i32;
        [l.x.rem_euclid(w) as u32, l.y.rem_euclid(w) as u32]
    }

    /// Whether logical coordinate `l` is inside the window.
    #[inline]
    #[must_use]
    pub fn contains(&self, l: IVec2, window_size: u32) -> bool {
        let w = i64::from(window_size);
        let inside = |origin: i32, v: i32| {
            let d = i64::from(v) - i64::from(origin);
            (0..w).contains(&d)
        };
        inside(self.top_left_x, l.x) && inside(self.top_left_y, l.y)
    }
}

impl Default for HeightWindow {
    fn default() -> Self {
        Self::new()
    }
}
