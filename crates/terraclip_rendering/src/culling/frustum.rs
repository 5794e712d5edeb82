//! Frustum culling for clipmap instances.
//!
//! Extracts frustum planes from the view-projection matrix and tests
//! axis-aligned boxes against them.

use bytemuck::{Pod, Zeroable};

use crate::config::CullingMode;

/// A plane in 3D space (Ax + By + Cz + D = 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    /// Normal X component.
    pub a: f32,
    /// Normal Y component.
    pub b: f32,
    /// Normal Z component.
    pub c: f32,
    /// Distance from origin.
    pub d: f32,
}

impl Plane {
    /// Creates a new plane.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Normalizes the plane.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len > 0.0 {
            Self {
                a: self.a / len,
                b: self.b / len,
                c: self.c / len,
                d: self.d / len,
            }
        } else {
            self
        }
    }

    /// Returns the signed distance from a point to the plane.
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, x: f32, y: f32, z: f32) -> f32 {
        self.a * x + self.b * y + self.c * z + self.d
    }
}

/// Axis-aligned bounding box in world space (Y up).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Aabb {
    /// Box over a ground rectangle `[x0, x1] x [z0, z1]` spanning the
    /// height interval `[y0, y1]`.
    #[must_use]
    pub const fn from_ground_rect(x: [f32; 2], z: [f32; 2], y: [f32; 2]) -> Self {
        Self {
            min: [x[0], y[0], z[0]],
            max: [x[1], y[1], z[1]],
        }
    }

    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Returns the half-extents of the box.
    #[must_use]
    pub fn half_extents(&self) -> [f32; 3] {
        [
            (self.max[0] - self.min[0]) * 0.5,
            (self.max[1] - self.min[1]) * 0.5,
            (self.max[2] - self.min[2]) * 0.5,
        ]
    }
}

/// View frustum for culling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far planes.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Plane indices.
    pub const LEFT: usize = 0;
    /// Right plane index.
    pub const RIGHT: usize = 1;
    /// Bottom plane index.
    pub const BOTTOM: usize = 2;
    /// Top plane index.
    pub const TOP: usize = 3;
    /// Near plane index.
    pub const NEAR: usize = 4;
    /// Far plane index.
    pub const FAR: usize = 5;

    /// Extracts frustum planes from a view-projection matrix.
    ///
    /// The matrix should be in column-major order (OpenGL convention).
    #[must_use]
    pub fn from_view_projection(m: &[[f32; 4]; 4]) -> Self {
        let row = |r: usize| [m[0][r], m[1][r], m[2][r], m[3][r]];
        let combine = |a: [f32; 4], b: [f32; 4], sign: f32| {
            Plane::new(
                a[0] + sign * b[0],
                a[1] + sign * b[1],
                a[2] + sign * b[2],
                a[3] + sign * b[3],
            )
            .normalized()
        };
        let w = row(3);

        let mut planes = [Plane::default(); 6];
        // row3 +/- row0, row1, row2
        planes[Self::LEFT] = combine(w, row(0), 1.0);
        planes[Self::RIGHT] = combine(w, row(0), -1.0);
        planes[Self::BOTTOM] = combine(w, row(1), 1.0);
        planes[Self::TOP] = combine(w, row(1), -1.0);
        planes[Self::NEAR] = combine(w, row(2), 1.0);
        planes[Self::FAR] = combine(w, row(2), -1.0);

        Self { planes }
    }

    /// Returns false only if the box lies entirely outside one plane.
    ///
    /// Conservative: boxes near frustum corners may pass without
    /// intersecting, but a box touching the frustum never fails.
    #[must_use]
    pub fn intersects(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let half = aabb.half_extents();

        self.planes.iter().all(|plane| {
            // Projection interval radius of the box onto the plane normal
            let r = half[0] * plane.a.abs() + half[1] * plane.b.abs() + half[2] * plane.c.abs();
            plane.distance_to_point(center[0], center[1], center[2]) >= -r
        })
    }
}

/// Frustum culler with a configured strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumCuller {
    /// Current frustum.
    frustum: Frustum,
    /// Whether the frustum is consulted at all.
    mode: CullingMode,
}

impl FrustumCuller {
    /// Creates a culler. Until `update` is called the frustum is empty and
    /// every box passes.
    #[must_use]
    pub fn new(mode: CullingMode) -> Self {
        Self {
            frustum: Frustum::default(),
            mode,
        }
    }

    /// Updates the frustum from a view-projection matrix.
    pub fn update(&mut self, view_projection: &[[f32; 4]; 4]) {
        self.frustum = Frustum::from_view_projection(view_projection);
    }

    /// Tests if a box should be drawn.
    #[inline]
    #[must_use]
    pub fn is_visible(&self, aabb: &Aabb) -> bool {
        match self.mode {
            CullingMode::Frustum => self.frustum.intersects(aabb),
            CullingMode::Disabled => true,
        }
    }
}

impl Default for FrustumCuller {
    fn default() -> Self {
        Self::new(CullingMode::default())
    }
}
