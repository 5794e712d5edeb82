//! Benchmark for noise generation performance.
//!
//! TARGET: 1,000,000 samples per second, one 1024x1024 bake in under 2 seconds
//!
//! Run with: cargo bench --package terraclip_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use terraclip_core::HeightSource;
use terraclip_procedural::{HeightmapConfig, PeriodicHeightmap, PeriodicNoise, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = PeriodicNoise::new(WorldSeed::new(42));

    c.bench_function("single_noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), black_box(x * 0.7), 64))
        });
    });
}

fn benchmark_bake(c: &mut Criterion) {
    let config = HeightmapConfig {
        period: 256,
        ..HeightmapConfig::default()
    };

    let mut group = c.benchmark_group("heightmap_bake");
    group.throughput(Throughput::Elements(256 * 256));
    group.sample_size(10);
    group.bench_function("bake_256x256_6_octaves", |b| {
        b.iter(|| black_box(PeriodicHeightmap::generate(&config).map(|m| m.height_range())));
    });
    group.finish();
}

fn benchmark_table_lookup(c: &mut Criterion) {
    let map = PeriodicHeightmap::generate(&HeightmapConfig {
        period: 256,
        ..HeightmapConfig::default()
    })
    .expect("default config is valid");

    c.bench_function("baked_lookup_wrapping", |b| {
        let mut x = -10_000i32;
        b.iter(|| {
            x += 7;
            black_box(map.sample_height(black_box(x), black_box(x / 3)))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_bake,
    benchmark_table_lookup
);
criterion_main!(benches);
