//! Criterion micro-benchmarks for the frame store.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use slitwave_bench::REFERENCE_SHAPE;
use slitwave_core::SimulationParameters;
use slitwave_store::codec::{decode_field, encode_field};
use slitwave_store::FrameStore;
use slitwave_test_utils::random_field;

/// Benchmark: encode one 300x200 frame to bytes.
fn bench_encode_field(c: &mut Criterion) {
    let frame = random_field(REFERENCE_SHAPE, 1);
    c.bench_function("store_encode_field_60k", |b| {
        b.iter(|| black_box(encode_field(&frame)));
    });
}

/// Benchmark: decode the same frame.
fn bench_decode_field(c: &mut Criterion) {
    let bytes = encode_field(&random_field(REFERENCE_SHAPE, 1));
    c.bench_function("store_decode_field_60k", |b| {
        b.iter(|| black_box(decode_field(&bytes, REFERENCE_SHAPE).unwrap()));
    });
}

/// Benchmark: write and read back one frame through the file.
fn bench_write_read_frame(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let params = SimulationParameters::new(120.0, 8, 10).unwrap();
    let mut store = FrameStore::create(
        dir.path().join("bench.slit"),
        params,
        REFERENCE_SHAPE,
        REFERENCE_SHAPE,
    )
    .unwrap();
    let frame = random_field(REFERENCE_SHAPE, 2);

    c.bench_function("store_write_frame_60k", |b| {
        b.iter(|| store.write_frame(black_box(3), &frame).unwrap());
    });
    c.bench_function("store_read_frame_60k", |b| {
        b.iter(|| black_box(store.read_frame(3).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_encode_field,
    bench_decode_field,
    bench_write_read_frame
);
criterion_main!(benches);
