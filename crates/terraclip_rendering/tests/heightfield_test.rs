//! # Height Field Integration Test
//!
//! Streams a real periodic heightmap through the toroidal windows and
//! checks the windows against a fresh rebuild after every move.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terraclip_core::{HeightSource, IVec2, LevelSampler, Vec2};
use terraclip_procedural::{HeightmapConfig, PeriodicHeightmap, WorldSeed};
use terraclip_rendering::heightfield::HeightWindow;
use terraclip_rendering::{
    ClipmapMesh, HeightField, HeightTexel, LevelUpdate, TerrainConfig, TerrainContext, UploadSink,
};

fn heightmap() -> PeriodicHeightmap {
    PeriodicHeightmap::generate(&HeightmapConfig {
        seed: WorldSeed::new(31337),
        period: 512,
        base_cells: 2,
        octaves: 4,
        persistence: 0.5,
        amplitude: 12.0,
    })
    .expect("test config is valid")
}

fn context(size: u32, levels: u32) -> TerrainContext {
    TerrainContext::new(TerrainConfig {
        size,
        levels,
        clip_scale: 1.0,
        ..TerrainConfig::default()
    })
    .expect("test config is valid")
}

/// Collects every uploaded rectangle.
#[derive(Default)]
struct Recorder {
    regions: Vec<(u32, u32, u32, u32, u32, Vec<HeightTexel>)>,
    waits: Vec<u64>,
}

impl UploadSink for Recorder {
    fn upload_region(&mut self, level: u32, x: u32, y: u32, width: u32, height: u32, data: &[HeightTexel]) {
        assert_eq!(data.len(), (width * height) as usize);
        self.regions.push((level, x, y, width, height, data.to_vec()));
    }

    fn wait_for_frame(&mut self, frame: u64) {
        self.waits.push(frame);
    }
}

/// Every texel of every level holds the sample its window maps it to.
fn assert_window_matches_source<S: HeightSource>(field: &HeightField<S>, source: &PeriodicHeightmap) {
    let w = field.window_size();
    for level in 0..field.levels() {
        let window = field.window(level);
        let sampler = LevelSampler::new(source, level);
        for y in 0..w {
            for x in 0..w {
                let l = window.logical(x, y, w);
                let texel = field.texel_at_logical(level, l).expect("window covers its own texels");
                assert_eq!(texel.height, sampler.height(l.x, l.y), "level {level} texel ({x}, {y})");
                assert_eq!(texel.coarse_height, sampler.coarse_height(l.x, l.y));
            }
        }
    }
}

/// Test: after any sequence of moves, incremental updates leave the same
/// contents a full rebuild would.
#[test]
fn test_incremental_equals_rebuild_along_walk() {
    let source = heightmap();
    let context = context(8, 4);
    let mesh = ClipmapMesh::new(&context);
    let mut field = HeightField::new(&context, &source).expect("field fits in memory");
    let mut sink = Recorder::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let mut camera = Vec2::ZERO;
    let mut incremental = 0;
    for frame in 1..=120u64 {
        field.begin_frame(frame, &mut sink);
        // Mostly small steps, sometimes a jump
        let reach = if frame % 30 == 0 { 400.0 } else { 12.0 };
        camera = camera + Vec2::new(rng.gen_range(-reach..reach), rng.gen_range(-reach..reach));

        let summary = field.update(&mesh.level_offsets(camera)).expect("staging fits");
        incremental += summary.incremental_updates;
        field.flush(&mut sink);
        assert_window_matches_source(&field, &source);
    }
    assert!(incremental > 0, "walk never took the incremental path");
}

/// Test: each upload carries exactly the texels now in the texture.
#[test]
fn test_uploads_match_texel_mirror() {
    let source = heightmap();
    let context = context(4, 2);
    let mut field = HeightField::new(&context, &source).expect("field fits in memory");
    let mut sink = Recorder::default();

    for (frame, offset) in [(1, IVec2::new(0, 0)), (2, IVec2::new(6, -3)), (3, IVec2::new(-2, 9))] {
        field.begin_frame(frame, &mut sink);
        field.update(&[offset, offset]).expect("staging fits");
        field.flush(&mut sink);
    }

    let w = field.window_size();
    let mut replay = vec![vec![HeightTexel::default(); (w * w) as usize]; 2];
    for (level, x, y, width, height, data) in &sink.regions {
        for row in 0..*height {
            for col in 0..*width {
                replay[*level as usize][((y + row) * w + x + col) as usize] = data[(row * width + col) as usize];
            }
        }
    }
    for level in 0..2 {
        assert_eq!(replay[level as usize].as_slice(), field.texels(level));
    }
    assert_eq!(sink.waits, vec![1]);
}

/// Test: updating to the same offset twice changes nothing the second time.
#[test]
fn test_update_level_is_idempotent() {
    let source = heightmap();
    let context = context(8, 3);
    let mut field = HeightField::new(&context, &source).expect("field fits in memory");
    let mut sink = Recorder::default();

    field.begin_frame(1, &mut sink);
    let first = field.update_level(2, IVec2::new(-77, 40)).expect("staging fits");
    assert!(matches!(first, LevelUpdate::FullRebuild { .. }));
    let before = field.texels(2).to_vec();
    let window = *field.window(2);

    field.begin_frame(2, &mut sink);
    let second = field.update_level(2, IVec2::new(-77, 40)).expect("staging fits");
    assert_eq!(second, LevelUpdate::Unchanged);
    assert!(field.pending_regions().is_empty());
    assert_eq!(field.texels(2), before.as_slice());
    assert_eq!(*field.window(2), window);
}

/// Test: size 8, 3 levels, unit scale, camera from the origin to (100, 0).
///
/// The finer levels move further in their own texels: level 0 moves 100
/// texels and level 1 moves 50, past the 32 texel window, so both rebuild.
/// Level 2 moves 24 and updates one wrapped band.
#[test]
fn test_camera_jump_scenario() {
    let source = heightmap();
    let context = context(8, 3);
    let mesh = ClipmapMesh::new(&context);
    let mut field = HeightField::new(&context, &source).expect("field fits in memory");
    let mut sink = Recorder::default();

    let origin = mesh.level_offsets(Vec2::ZERO);
    assert_eq!(origin[0], origin[1] + IVec2::splat(16));
    assert_eq!(origin, vec![IVec2::splat(-12), IVec2::splat(-28), IVec2::splat(-56)]);

    field.begin_frame(1, &mut sink);
    let summary = field.update(&origin).expect("staging fits");
    assert_eq!(summary.full_rebuilds, 3);
    field.flush(&mut sink);

    // Same snapped offsets, nothing to do
    field.begin_frame(2, &mut sink);
    let nudged = mesh.level_offsets(Vec2::new(0.5, 0.5));
    assert_eq!(nudged, origin);
    let summary = field.update(&nudged).expect("staging fits");
    assert_eq!(summary.regions, 0);
    assert!(field.pending_regions().is_empty());

    field.begin_frame(3, &mut sink);
    let moved = mesh.level_offsets(Vec2::new(100.0, 0.0));
    let updates: Vec<_> = (0..3)
        .map(|level| field.update_level(level, moved[level as usize]).expect("staging fits"))
        .collect();

    assert_eq!(updates[0], LevelUpdate::FullRebuild { regions: 4 });
    assert_eq!(updates[1], LevelUpdate::FullRebuild { regions: 4 });
    assert_eq!(updates[2], LevelUpdate::Incremental { regions: 2 });

    // Level 2 window went from x = -14 to x = 10: texels [18, 32) and [0, 10)
    let level2: Vec<_> = field
        .pending_regions()
        .iter()
        .filter(|r| r.level == 2)
        .map(|r| (r.rect.x, r.rect.width, r.rect.height))
        .collect();
    assert_eq!(level2, vec![(18, 14, 32), (0, 10, 32)]);
    assert_eq!(field.window(2).top_left(), IVec2::new(10, -14));
    assert_eq!(HeightWindow::texel(IVec2::new(10, -14), 32), [10, 18]);

    field.flush(&mut sink);
    assert_window_matches_source(&field, &source);
}

/// Test: a dirty field rebuilds every level on its next update.
#[test]
fn test_invalidate_rebuilds_all_levels() {
    let source = heightmap();
    let context = context(4, 5);
    let mesh = ClipmapMesh::new(&context);
    let mut field = HeightField::new(&context, &source).expect("field fits in memory");
    let mut sink = Recorder::default();
    let offsets = mesh.level_offsets(Vec2::new(40.0, 40.0));

    field.begin_frame(1, &mut sink);
    field.update(&offsets).expect("staging fits");
    field.flush(&mut sink);

    field.invalidate();
    field.begin_frame(2, &mut sink);
    let summary = field.update(&offsets).expect("staging fits");
    assert_eq!(summary.full_rebuilds, 5);
    let texels: usize = field.pending_regions().iter().map(|r| r.rect.area()).sum();
    assert_eq!(texels, 5 * 16 * 16);
}
