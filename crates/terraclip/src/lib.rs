//! # TERRACLIP
//!
//! Headless driver for the clipmap terrain pipeline.
//!
//! ## Modules
//!
//! - `flythrough`: configuration, camera path and the frame loop
//! - `recording`: an in-memory `RenderBackend`
//! - `error`: the fly-through error type

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod flythrough;
pub mod recording;

pub use terraclip_core as core;
pub use terraclip_procedural as procedural;
pub use terraclip_rendering as rendering;

pub use error::{FlythroughError, FlythroughResult};
pub use flythrough::{run, CameraConfig, CameraPath, CameraPose, FlythroughConfig, FlythroughSummary};
pub use recording::{MeshRecord, RecordingBackend, RecordingTotals, TextureRecord};
