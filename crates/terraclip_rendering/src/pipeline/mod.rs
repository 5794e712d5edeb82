//! Frame driver.
//!
//! Composes the terrain for one frame:
//!
//! ```text
//! camera ─► level offsets ─► height windows ─► uploads
//!                 │
//!                 └────────► draw list (culled) ─► instance bytes ─► draws
//! ```

mod stats;

pub use stats::FrameStats;

use terraclip_core::{HeightSource, IVec2, Vec2};

use crate::backend::{MeshId, RenderBackend, TextureId};
use crate::clipmap::ClipmapMesh;
use crate::config::{TerrainConfig, TerrainContext};
use crate::culling::FrustumCuller;
use crate::error::TerrainResult;
use crate::heightfield::HeightField;

/// Owns every terrain subsystem and drives them once per frame.
#[derive(Debug)]
pub struct TerrainRenderer<S> {
    /// Validated configuration.
    context: TerrainContext,
    /// Static templates and the instance buffer.
    mesh: ClipmapMesh,
    /// Toroidal height windows.
    height_field: HeightField<S>,
    /// Frustum test for block instances.
    culler: FrustumCuller,
    /// Backend handle of the template mesh.
    mesh_id: MeshId,
    /// Backend handle of the height texture array.
    texture_id: TextureId,
    /// Last rendered frame, 0 before the first.
    frame: u64,
    /// Level offsets, reused every frame.
    offsets: Vec<IVec2>,
    /// Statistics of the last frame.
    stats: FrameStats,
}

impl<S: HeightSource> TerrainRenderer<S> {
    /// Validates `config`, builds the mesh and height field, and creates
    /// the static backend resources.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a bad configuration or height source,
    /// `OutOfMemory` if height storage cannot be reserved.
    pub fn new<B: RenderBackend + ?Sized>(
        config: TerrainConfig,
        source: S,
        backend: &mut B,
    ) -> TerrainResult<Self> {
        let context = TerrainContext::new(config)?;
        let mesh = ClipmapMesh::new(&context);
        let height_field = HeightField::new(&context, source)?;

        let geometry = mesh.geometry();
        let mesh_id = backend.create_static_mesh(geometry.vertices(), geometry.indices());
        let texture_id =
            backend.create_height_texture(height_field.window_size(), context.levels());

        tracing::info!(?mesh_id, ?texture_id, "terrain renderer ready");

        Ok(Self {
            culler: FrustumCuller::new(context.config().culling),
            offsets: Vec::with_capacity(context.levels() as usize),
            context,
            mesh,
            height_field,
            mesh_id,
            texture_id,
            frame: 0,
            stats: FrameStats::default(),
        })
    }

    /// Renders one frame for a camera at world XZ `camera` seeing through
    /// `view_projection`.
    ///
    /// # Errors
    ///
    /// `OutOfMemory` from the height update or `InstanceCapacityExceeded`
    /// from the draw list. Both are fatal.
    pub fn render_frame<B: RenderBackend + ?Sized>(
        &mut self,
        camera: Vec2,
        view_projection: &[[f32; 4]; 4],
        backend: &mut B,
    ) -> TerrainResult<FrameStats> {
        self.frame += 1;
        let frame = self.frame;

        self.height_field.begin_frame(frame, backend);
        self.mesh.write_level_offsets(camera, &mut self.offsets);
        let update = self.height_field.update(&self.offsets)?;
        let flushed = self.height_field.flush(backend);

        self.culler.update(view_projection);
        let list = self.mesh.build_draw_list(&self.offsets, &self.culler)?;

        backend.upload_instances(list.as_bytes());
        let mut draw_calls = 0;
        for command in list.draw_commands(self.mesh_id) {
            backend.issue_instanced_draw(&command);
            draw_calls += 1;
        }

        self.stats = FrameStats {
            frame,
            draw_calls,
            instances: list.instance_count() as u32,
            instances_culled: list.culled(),
            regions_uploaded: flushed.regions,
            texels_uploaded: flushed.texels,
            full_rebuilds: update.full_rebuilds,
            incremental_updates: update.incremental_updates,
        };

        tracing::trace!(
            frame,
            draw_calls,
            instances = self.stats.instances,
            regions = flushed.regions,
            "terrain frame"
        );

        Ok(self.stats)
    }

    /// Forces every height level to rebuild on the next frame.
    pub fn invalidate(&mut self) {
        self.height_field.invalidate();
    }

    /// Statistics of the last frame.
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Last rendered frame number.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Configuration in use.
    #[must_use]
    pub const fn context(&self) -> &TerrainContext {
        &self.context
    }

    /// The clipmap mesh.
    #[must_use]
    pub const fn mesh(&self) -> &ClipmapMesh {
        &self.mesh
    }

    /// The height field.
    #[must_use]
    pub const fn height_field(&self) -> &HeightField<S> {
        &self.height_field
    }

    /// Level offsets of the last frame.
    #[must_use]
    pub fn offsets(&self) -> &[IVec2] {
        &self.offsets
    }

    /// Backend handle of the template mesh.
    #[must_use]
    pub const fn mesh_id(&self) -> MeshId {
        self.mesh_id
    }

    /// Backend handle of the height texture array.
    #[must_use]
    pub const fn texture_id(&self) -> TextureId {
        self.texture_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DrawSink, UploadSink};
    use crate::config::CullingMode;
    use crate::heightfield::HeightTexel;
    use crate::instancing::DrawCommand;

    struct Flat;

    impl HeightSource for Flat {
        fn sample_height(&self, _: i32, _: i32) -> f32 {
            0.0
        }

        fn period(&self) -> i32 {
            1 << 20
        }
    }

    #[derive(Default)]
    struct Counting {
        meshes: u32,
        textures: Vec<(u32, u32)>,
        uploads: u32,
        waits: Vec<u64>,
        draws: Vec<DrawCommand>,
        instance_bytes: usize,
    }

    impl UploadSink for Counting {
        fn upload_region(&mut self, _: u32, _: u32, _: u32, _: u32, _: u32, _: &[HeightTexel]) {
            self.uploads += 1;
        }

        fn wait_for_frame(&mut self, frame: u64) {
            self.waits.push(frame);
        }
    }

    impl DrawSink for Counting {
        fn upload_instances(&mut self, bytes: &[u8]) {
            self.instance_bytes = bytes.len();
        }

        fn issue_instanced_draw(&mut self, command: &DrawCommand) {
            self.draws.push(command.clone());
        }
    }

    impl RenderBackend for Counting {
        fn create_static_mesh(&mut self, _: &[[u8; 2]], _: &[u16]) -> MeshId {
            self.meshes += 1;
            MeshId(self.meshes)
        }

        fn create_height_texture(&mut self, size: u32, layers: u32) -> TextureId {
            self.textures.push((size, layers));
            TextureId(0)
        }
    }

    fn config() -> TerrainConfig {
        TerrainConfig {
            size: 8,
            levels: 3,
            clip_scale: 1.0,
            culling: CullingMode::Disabled,
            ..TerrainConfig::default()
        }
    }

    #[test]
    fn test_new_creates_resources_once() {
        let mut backend = Counting::default();
        let renderer = TerrainRenderer::new(config(), Flat, &mut backend).unwrap();

        assert_eq!(backend.meshes, 1);
        assert_eq!(backend.textures, vec![(32, 3)]);
        assert_eq!(renderer.mesh_id(), MeshId(1));
        assert_eq!(renderer.frame(), 0);
    }

    #[test]
    fn test_first_frame_uploads_every_level() {
        let mut backend = Counting::default();
        let mut renderer = TerrainRenderer::new(config(), Flat, &mut backend).unwrap();
        let stats = renderer
            .render_frame(Vec2::ZERO, &[[0.0; 4]; 4], &mut backend)
            .unwrap();

        assert_eq!(stats.frame, 1);
        assert_eq!(stats.full_rebuilds, 3);
        assert_eq!(stats.texels_uploaded, 3 * 32 * 32);
        assert_eq!(stats.regions_uploaded, backend.uploads);
        assert_eq!(stats.draw_calls as usize, backend.draws.len());
        assert_eq!(backend.instance_bytes, stats.instances as usize * 32);
    }

    #[test]
    fn test_still_camera_uploads_nothing() {
        let mut backend = Counting::default();
        let mut renderer = TerrainRenderer::new(config(), Flat, &mut backend).unwrap();
        let view = [[0.0; 4]; 4];
        renderer.render_frame(Vec2::ZERO, &view, &mut backend).unwrap();

        let stats = renderer
            .render_frame(Vec2::new(0.5, 0.5), &view, &mut backend)
            .unwrap();
        assert_eq!(stats.regions_uploaded, 0);
        assert_eq!(stats.full_rebuilds + stats.incremental_updates, 0);
        assert!(stats.draw_calls > 0);
    }

    #[test]
    fn test_waits_on_frame_two_back() {
        let mut backend = Counting::default();
        let mut renderer = TerrainRenderer::new(config(), Flat, &mut backend).unwrap();
        let view = [[0.0; 4]; 4];
        for _ in 0..4 {
            renderer.render_frame(Vec2::ZERO, &view, &mut backend).unwrap();
        }
        assert_eq!(backend.waits, vec![1, 2]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut backend = Counting::default();
        let config = TerrainConfig {
            levels: 0,
            ..config()
        };
        assert!(TerrainRenderer::new(config, Flat, &mut backend).is_err());
        assert_eq!(backend.meshes, 0);
    }
}
