use criterion::{black_box, criterion_group, criterion_main, Criterion};

extern crate cvm;
use cvm::config::CircleConfig;
use cvm::geometry::{extract, HeadingWrap};
use cvm::simulation::generators;

fn extract_circle(b: &mut Criterion) {
    let config = CircleConfig {
        num_poses: 10_000,
        ..Default::default()
    };
    let trajectory = generators::circle(&config).expect("valid circle");

    b.bench_function("extract_raw_10k", |b| {
        b.iter(|| extract(black_box(&trajectory), HeadingWrap::Raw))
    });
    b.bench_function("extract_normalized_10k", |b| {
        b.iter(|| extract(black_box(&trajectory), HeadingWrap::Normalized))
    });
}

criterion_group!(benches, extract_circle);
criterion_main!(benches);
