//! Visibility culling for clipmap instances.
//!
//! Each candidate instance gets a world-space box from its block footprint
//! and the configured height range; boxes outside the view frustum are
//! dropped before they reach the instance buffer.

mod frustum;
mod projection;

pub use frustum::{Aabb, Frustum, FrustumCuller, Plane};
pub use projection::{look_at, multiply, perspective};
