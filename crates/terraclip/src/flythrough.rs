//! # Fly-Through
//!
//! Flies a camera over a procedural heightmap and renders every frame
//! through a `RenderBackend`.
//!
//! ```toml
//! frames = 600
//! log_every = 60
//!
//! [terrain]
//! size = 32
//! levels = 8
//!
//! [heightmap]
//! period = 2048
//!
//! [camera]
//! speed = 1.5
//! turn_rate = 0.002
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use terraclip_core::{HeightSource, Vec2};
use terraclip_procedural::{HeightmapConfig, PeriodicHeightmap};
use terraclip_rendering::culling::{look_at, multiply, perspective};
use terraclip_rendering::{FrameStats, RenderBackend, TerrainConfig, TerrainRenderer};

use crate::error::{FlythroughError, FlythroughResult};

/// Camera motion and projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Starting world XZ position.
    pub start: [f32; 2],
    /// Starting heading in radians, 0 along +X.
    pub heading: f32,
    /// World units travelled per frame.
    pub speed: f32,
    /// Heading change per frame, in radians.
    pub turn_rate: f32,
    /// Height above the terrain.
    pub altitude: f32,
    /// How far below the horizon the camera looks, in radians.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width over height.
    pub aspect: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Jump `teleport_distance` ahead every this many frames; 0 never jumps.
    pub teleport_every: u64,
    /// Length of a jump.
    pub teleport_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 0.0],
            heading: 0.0,
            speed: 1.0,
            turn_rate: 0.002,
            altitude: 8.0,
            pitch: 0.25,
            fov_y: 1.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1500.0,
            teleport_every: 0,
            teleport_distance: 5000.0,
        }
    }
}

impl CameraConfig {
    /// Checks the camera parameters.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> FlythroughResult<()> {
        let finite = [
            self.start[0],
            self.start[1],
            self.heading,
            self.speed,
            self.turn_rate,
            self.altitude,
            self.pitch,
            self.teleport_distance,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(FlythroughError::InvalidConfig(
                "camera values must be finite".to_string(),
            ));
        }
        if !(self.fov_y > 0.0 && self.fov_y < std::f32::consts::PI) {
            return Err(FlythroughError::InvalidConfig(format!(
                "fov_y {} must be in (0, pi)",
                self.fov_y
            )));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(FlythroughError::InvalidConfig(format!(
                "aspect {} must be positive",
                self.aspect
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(FlythroughError::InvalidConfig(format!(
                "clip planes near {} far {} must satisfy 0 < near < far",
                self.near, self.far
            )));
        }
        if self.pitch.abs() >= std::f32::consts::FRAC_PI_2 {
            return Err(FlythroughError::InvalidConfig(format!(
                "pitch {} must be within (-pi/2, pi/2)",
                self.pitch
            )));
        }
        Ok(())
    }
}

/// A complete fly-through run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlythroughConfig {
    /// Frames to render.
    pub frames: u64,
    /// Log statistics every this many frames; 0 logs only the summary.
    pub log_every: u64,
    /// Clipmap parameters.
    pub terrain: TerrainConfig,
    /// Height generation parameters.
    pub heightmap: HeightmapConfig,
    /// Camera path.
    pub camera: CameraConfig,
}

impl Default for FlythroughConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            log_every: 60,
            terrain: TerrainConfig::default(),
            heightmap: HeightmapConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl FlythroughConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed TOML, `InvalidConfig`, `Terrain` or
    /// `Heightmap` for values out of range.
    pub fn from_toml_str(text: &str) -> FlythroughResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| FlythroughError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `ConfigIo` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn load(path: impl AsRef<Path>) -> FlythroughResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FlythroughError::ConfigIo(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// The first section's error.
    pub fn validate(&self) -> FlythroughResult<()> {
        self.terrain.validate()?;
        self.heightmap.validate()?;
        self.camera.validate()
    }
}

/// Camera state for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// World XZ position.
    pub position: Vec2,
    /// Eye height.
    pub height: f32,
    /// Column-major view-projection matrix.
    pub view_projection: [[f32; 4]; 4],
    /// Whether the camera jumped this frame.
    pub teleported: bool,
}

/// Deterministic camera path: constant speed along a slowly turning heading.
#[derive(Clone, Debug)]
pub struct CameraPath {
    config: CameraConfig,
    position: Vec2,
    heading: f32,
    frame: u64,
    projection: [[f32; 4]; 4],
}

impl CameraPath {
    /// Starts a path at the configured position.
    #[must_use]
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec2::new(config.start[0], config.start[1]),
            heading: config.heading,
            frame: 0,
            projection: perspective(config.fov_y, config.aspect, config.near, config.far),
            config: config.clone(),
        }
    }

    /// Current world XZ position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves one frame ahead and returns the pose, with the eye
    /// `altitude` above `ground` at the new position.
    pub fn advance(&mut self, ground: impl Fn(Vec2) -> f32) -> CameraPose {
        self.frame += 1;
        let direction = Vec2::new(self.heading.cos(), self.heading.sin());

        let teleported = self.config.teleport_every > 0 && self.frame % self.config.teleport_every == 0;
        let step = if teleported {
            self.config.teleport_distance
        } else {
            self.config.speed
        };
        self.position = self.position + direction * step;
        self.heading += self.config.turn_rate;

        let height = ground(self.position) + self.config.altitude;
        let eye = [self.position.x, height, self.position.y];
        let (sin_pitch, cos_pitch) = self.config.pitch.sin_cos();
        let target = [
            eye[0] + direction.x * cos_pitch,
            eye[1] - sin_pitch,
            eye[2] + direction.y * cos_pitch,
        ];
        let view = look_at(eye, target, [0.0, 1.0, 0.0]);

        CameraPose {
            position: self.position,
            height,
            view_projection: multiply(&self.projection, &view),
            teleported,
        }
    }
}

/// Totals of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlythroughSummary {
    /// Frames rendered.
    pub frames: u64,
    /// Most draw calls in one frame.
    pub max_draw_calls: u32,
    /// Instances drawn across all frames.
    pub instances: u64,
    /// Instances culled across all frames.
    pub instances_culled: u64,
    /// Height rectangles uploaded.
    pub regions_uploaded: u64,
    /// Height texels uploaded.
    pub texels_uploaded: u64,
    /// Level rebuilds.
    pub full_rebuilds: u64,
    /// Incremental level updates.
    pub incremental_updates: u64,
    /// Camera jumps.
    pub teleports: u64,
}

impl FlythroughSummary {
    fn record(&mut self, stats: &FrameStats) {
        self.frames += 1;
        self.max_draw_calls = self.max_draw_calls.max(stats.draw_calls);
        self.instances += u64::from(stats.instances);
        self.instances_culled += u64::from(stats.instances_culled);
        self.regions_uploaded += u64::from(stats.regions_uploaded);
        self.texels_uploaded += stats.texels_uploaded;
        self.full_rebuilds += u64::from(stats.full_rebuilds);
        self.incremental_updates += u64::from(stats.incremental_updates);
    }
}

/// Generates the heightmap, builds the renderer and renders every frame.
///
/// # Errors
///
/// Any configuration, generation or per-frame error. All are fatal.
pub fn run<B: RenderBackend + ?Sized>(
    config: &FlythroughConfig,
    backend: &mut B,
) -> FlythroughResult<FlythroughSummary> {
    config.validate()?;

    let heightmap = PeriodicHeightmap::generate(&config.heightmap)?;
    tracing::info!(
        period = heightmap.period(),
        frames = config.frames,
        "generated heightmap"
    );

    let (min_height, max_height) = heightmap.height_range();
    if min_height < config.terrain.cull_height_min || max_height > config.terrain.cull_height_max {
        tracing::warn!(
            min_height,
            max_height,
            cull_min = config.terrain.cull_height_min,
            cull_max = config.terrain.cull_height_max,
            "terrain exceeds the culling height range, visible blocks may be culled"
        );
    }

    let clip_scale = config.terrain.clip_scale;
    let mut renderer = TerrainRenderer::new(config.terrain.clone(), heightmap, backend)?;
    let mut path = CameraPath::new(&config.camera);
    let mut summary = FlythroughSummary::default();

    for _ in 0..config.frames {
        let source = renderer.height_field().source();
        let pose = path.advance(|p| {
            let grid = p / clip_scale;
            source.sample_height(grid.x.round() as i32, grid.y.round() as i32)
        });
        if pose.teleported {
            tracing::debug!(x = pose.position.x, z = pose.position.y, "camera teleported");
            summary.teleports += 1;
        }

        let stats = renderer.render_frame(pose.position, &pose.view_projection, backend)?;
        summary.record(&stats);

        if config.log_every > 0 && stats.frame % config.log_every == 0 {
            tracing::info!(
                frame = stats.frame,
                draw_calls = stats.draw_calls,
                instances = stats.instances,
                culled = stats.instances_culled,
                visible = stats.visible_ratio(),
                regions = stats.regions_uploaded,
                texels = stats.texels_uploaded,
                "frame stats"
            );
        }
    }

    tracing::info!(?summary, "fly-through finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_is_valid() {
        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_camera_rejects_bad_planes() {
        let camera = CameraConfig {
            near: 10.0,
            far: 5.0,
            ..CameraConfig::default()
        };
        assert!(matches!(camera.validate(), Err(FlythroughError::InvalidConfig(_))));
    }

    #[test]
    fn test_path_moves_at_speed() {
        let mut path = CameraPath::new(&CameraConfig {
            speed: 2.0,
            turn_rate: 0.0,
            ..CameraConfig::default()
        });
        let pose = path.advance(|_| 3.0);
        assert_eq!(pose.position, Vec2::new(2.0, 0.0));
        assert_eq!(pose.height, 11.0);
        assert!(!pose.teleported);
    }

    #[test]
    fn test_path_teleports() {
        let mut path = CameraPath::new(&CameraConfig {
            speed: 1.0,
            turn_rate: 0.0,
            teleport_every: 3,
            teleport_distance: 100.0,
            ..CameraConfig::default()
        });
        let poses: Vec<_> = (0..3).map(|_| path.advance(|_| 0.0)).collect();
        assert!(poses[2].teleported);
        assert_eq!(path.position(), Vec2::new(102.0, 0.0));
    }

    #[test]
    fn test_toml_sections() {
        let config = FlythroughConfig::from_toml_str(
            r#"
            frames = 10

            [terrain]
            size = 8
            levels = 3

            [camera]
            speed = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(config.frames, 10);
        assert_eq!(config.terrain.size, 8);
        assert_eq!(config.camera.speed, 4.0);
        assert_eq!(config.heightmap, HeightmapConfig::default());
    }

    #[test]
    fn test_terrain_errors_pass_through() {
        let err = FlythroughConfig::from_toml_str("[terrain]\nsize = 7").unwrap_err();
        assert!(matches!(err, FlythroughError::Terrain(_)));
    }
}
