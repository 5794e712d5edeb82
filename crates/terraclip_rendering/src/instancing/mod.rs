//! Per-frame instance data for the clipmap blocks.
//!
//! Every visible block instance becomes one `InstanceParams`. Instances of
//! the same block kind, across all levels, form one `DrawBatch`, so the
//! whole terrain draws with one instanced call per kind.
//!
//! ## Key Concepts
//!
//! - **Instance Buffer**: fixed-capacity arena, reset every frame
//! - **Batches**: arena ranges, never pointers into the buffer
//! - **Alignment**: batch starts padded to the backend's uniform alignment

mod buffer;
mod instance_data;

pub use buffer::{DrawBatch, InstanceBuffer, PendingBatch};
pub use instance_data::{DrawCommand, InstanceParams};
