//! Benchmark for chunk generation performance.
//!
//! Run with: cargo bench --package veldt_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use veldt_procedural::biome::BiomeClassifier;
use veldt_procedural::chunk::ChunkCoord;
use veldt_procedural::noise::WorldSeed;
use veldt_procedural::{ChunkSource, FlatGenerator, TerrainGenerator};

fn benchmark_single_chunk(c: &mut Criterion) {
    let gen = TerrainGenerator::new(WorldSeed::new(42));

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.generate_chunk(ChunkCoord::new(coord, coord / 2)))
        });
    });
}

fn benchmark_chunk_grid(c: &mut Criterion) {
    let gen = TerrainGenerator::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("chunk_grid");
    group.sample_size(10);

    // 8x8 chunks = 128x128 blocks
    group.throughput(Throughput::Elements(8 * 8));
    group.bench_function("8x8_chunks", |b| {
        b.iter(|| {
            for z in 0..8 {
                for x in 0..8 {
                    black_box(gen.generate_chunk(ChunkCoord::new(x, z)));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_block_at(c: &mut Criterion) {
    let gen = TerrainGenerator::new(WorldSeed::new(42));

    c.bench_function("block_at_point_query", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(7);
            black_box(gen.block_at(black_box(x), 64, black_box(x / 3)))
        });
    });
}

fn benchmark_biome_classification(c: &mut Criterion) {
    let classifier = BiomeClassifier::new(WorldSeed::new(42));

    c.bench_function("biome_classification_per_column", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            black_box(classifier.biome_at(black_box(x), black_box(x / 2)).id)
        });
    });
}

fn benchmark_flat_chunk(c: &mut Criterion) {
    let gen = FlatGenerator;

    c.bench_function("flat_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.generate_chunk(ChunkCoord::new(coord, -coord)))
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benchmark_single_chunk,
              benchmark_chunk_grid,
              benchmark_block_at,
              benchmark_biome_classification,
              benchmark_flat_chunk
}

criterion_main!(benches);
