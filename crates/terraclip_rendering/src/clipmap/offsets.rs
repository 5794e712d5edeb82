//! # Level Offsets
//!
//! Each level's frame is anchored to the camera, snapped to the grid of the
//! next coarser level so a level only moves in whole coarse cells:
//!
//! ```text
//! level L >= 1:  snapped = floor(cam / clip_scale / 2^(L+1)) * 2^(L+1)
//!                offset  = snapped - (2 * (size - 1)) << L
//! level 0:       offset  = offset_1 + 2 * size
//! ```
//!
//! Offsets are in level-0 grid units. Because of the floor, a finer level
//! sits either flush with the top-left corner of the coarser level's hole
//! or one coarse cell further in; that difference picks the trim quadrant.

use terraclip_core::{IVec2, Vec2};

use super::block::Quadrant;

/// Top-left corner of level `level`'s frame, in level-0 grid units.
#[must_use]
pub fn level_offset(camera: Vec2, level: u32, size: u32, clip_scale: f32) -> IVec2 {
    if level == 0 {
        return level_offset(camera, 1, size, clip_scale) + IVec2::splat((size << 1) as i32);
    }

    let step = f64::from(1u32 << (level + 1));
    let snap = |v: f32| {
        let scaled = f64::from(v) / f64::from(clip_scale);
        ((scaled / step).floor() * step) as i32
    };
    let border = ((2 * (size - 1)) << level) as i32;

    IVec2::new(
        snap(camera.x).saturating_sub(border),
        snap(camera.y).saturating_sub(border),
    )
}

/// Indexed by `[finer is shifted down][finer is shifted right]`.
const QUADRANT_TABLE: [[Quadrant; 2]; 2] = [
    [Quadrant::BottomRight, Quadrant::BottomLeft],
    [Quadrant::TopRight, Quadrant::TopLeft],
];

/// Picks the L-shaped trim that closes level `level`'s hole around level
/// `level - 1`.
///
/// `finer` and `coarser` are the offsets of levels `level - 1` and `level`.
#[must_use]
pub fn trim_quadrant(finer: IVec2, coarser: IVec2, level: u32, size: u32) -> Quadrant {
    let hole = coarser + IVec2::splat(((size - 1) << level) as i32);
    let shift = finer - hole;
    debug_assert!(
        [0, 1 << level].contains(&shift.x) && [0, 1 << level].contains(&shift.y),
        "level {level} hole shift {shift:?} is not 0 or one coarse cell"
    );
    QUADRANT_TABLE[usize::from(shift.y > 0)][usize::from(shift.x > 0)]
}
