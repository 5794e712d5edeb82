//! Small vector types shared across the workspace.
//!
//! World space is Y-up; the terrain lives in the XZ plane, so a `Vec2`
//! position means `(world_x, world_z)`.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D float vector - camera positions, world offsets
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component (world Z)
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Same value on both axes
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// 2D integer vector - grid positions in level-0 vertex units
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct IVec2 {
    /// X component
    pub x: i32,
    /// Y component
    pub y: i32,
}

impl IVec2 {
    /// Creates a new IVec2
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0, 0);

    /// Same value on both axes
    #[must_use]
    pub const fn splat(v: i32) -> Self {
        Self::new(v, v)
    }
}

impl std::ops::Add for IVec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for IVec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Arithmetic right shift on both axes (floor division by `2^shift`).
impl std::ops::Shr<u32> for IVec2 {
    type Output = Self;
    fn shr(self, shift: u32) -> Self {
        Self::new(self.x >> shift, self.y >> shift)
    }
}

impl std::ops::Shl<u32> for IVec2 {
    type Output = Self;
    fn shl(self, shift: u32) -> Self {
        Self::new(self.x << shift, self.y << shift)
    }
}
