//! Benchmark for per-frame arena fill and reset.
//!
//! TARGET: a full clipmap frame (25 instances x 16 levels) well under 1us
//!
//! Run with: cargo bench --package terraclip_core --bench arena_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use terraclip_core::InstanceArena;

fn benchmark_frame_fill(c: &mut Criterion) {
    let mut arena: InstanceArena<[f32; 8]> = InstanceArena::new(2 * 25 * 16);

    c.bench_function("arena_fill_336_instances", |b| {
        b.iter(|| {
            arena.reset();
            for batch in 0..13 {
                let start = arena.align_to(4).unwrap_or(0);
                for i in 0..(25 * 16 / 13) {
                    let _ = arena.push([black_box((batch * i) as f32); 8]);
                }
                black_box(arena.range_from(start));
            }
            black_box(arena.as_bytes().len())
        });
    });
}

criterion_group!(benches, benchmark_frame_fill);
criterion_main!(benches);
