//! Benchmark for height window streaming.
//!
//! TARGET: walking camera costs a few bands per frame, full rebuild of 10
//! levels at size 64 well under one frame
//!
//! Run with: cargo bench --package terraclip_rendering --bench heightfield_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use terraclip_core::Vec2;
use terraclip_procedural::{HeightmapConfig, PeriodicHeightmap};
use terraclip_rendering::{ClipmapMesh, HeightField, HeightTexel, TerrainConfig, TerrainContext, UploadSink};

/// Drops every upload.
struct NullSink;

impl UploadSink for NullSink {
    fn upload_region(&mut self, _: u32, _: u32, _: u32, _: u32, _: u32, data: &[HeightTexel]) {
        black_box(data.len());
    }
}

fn benchmark_streaming(c: &mut Criterion) {
    let map = PeriodicHeightmap::generate(&HeightmapConfig {
        period: 1024,
        ..HeightmapConfig::default()
    })
    .expect("config is valid");
    let context = TerrainContext::new(TerrainConfig::default()).expect("default config is valid");
    let mesh = ClipmapMesh::new(&context);
    let mut field = HeightField::new(&context, &map).expect("field fits in memory");
    let mut sink = NullSink;
    let mut frame = 0u64;

    let mut group = c.benchmark_group("heightfield");
    group.bench_function("walk_one_unit_per_frame", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            frame += 1;
            x += 1.0;
            field.begin_frame(frame, &mut sink);
            let summary = field.update(&mesh.level_offsets(Vec2::new(x, 0.0)));
            field.flush(&mut sink);
            black_box(summary)
        });
    });

    let texels = u64::from(context.levels()) * u64::from(context.config().window_size()).pow(2);
    group.throughput(Throughput::Elements(texels));
    group.sample_size(10);
    group.bench_function("full_rebuild_10_levels", |b| {
        let offsets = mesh.level_offsets(Vec2::ZERO);
        b.iter(|| {
            frame += 1;
            field.invalidate();
            field.begin_frame(frame, &mut sink);
            let summary = field.update(&offsets);
            field.flush(&mut sink);
            black_box(summary)
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_streaming);
criterion_main!(benches);
