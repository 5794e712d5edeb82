//! # TERRACLIP Rendering
//!
//! Geometry-clipmap terrain streaming:
//! - Nested square rings of instanced block templates, at most 12 draw calls
//!   per frame regardless of level count
//! - A toroidal height window per level, refreshed band by band as the
//!   camera moves
//! - Frustum culling of every block instance before it is packed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TerrainRenderer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  camera → ClipmapMesh::level_offsets                        │
//! │              ↓                        ↓                     │
//! │  HeightField::update → flush   build_draw_list (culled)     │
//! │              ↓                        ↓                     │
//! │       UploadSink::upload_region   DrawSink::issue_draw      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The graphics API lives behind `RenderBackend`; nothing in this crate
//! touches a device.
//!
//! ## Example
//!
//! ```rust,ignore
//! use terraclip_rendering::{TerrainConfig, TerrainRenderer};
//!
//! let mut renderer = TerrainRenderer::new(TerrainConfig::default(), heights, &mut backend)?;
//! loop {
//!     let stats = renderer.render_frame(camera_xz, &view_projection, &mut backend)?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod clipmap;
pub mod config;
pub mod culling;
pub mod error;
pub mod heightfield;
pub mod instancing;
pub mod pipeline;

pub use backend::{DrawSink, MeshId, RenderBackend, TextureId, UploadSink};
pub use clipmap::{BlockKind, ClipmapGeometry, ClipmapMesh, DrawList, Edge, Quadrant};
pub use config::{CullingMode, TerrainConfig, TerrainContext};
pub use culling::{Aabb, Frustum, FrustumCuller};
pub use error::{TerrainError, TerrainResult};
pub use heightfield::{HeightField, HeightTexel, LevelUpdate, UpdateSummary};
pub use instancing::{DrawBatch, DrawCommand, InstanceParams};
pub use pipeline::{FrameStats, TerrainRenderer};
