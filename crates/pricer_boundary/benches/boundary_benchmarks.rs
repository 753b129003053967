//! Criterion benchmarks for the boundary engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pricer_boundary::{
    approximate_boundaries, refine_boundaries, BoundaryFunction, EngineConfig, MarketParameters,
    OptionSide,
};

fn benchmark_put() -> MarketParameters {
    MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap()
}

fn negative_rate_put() -> MarketParameters {
    MarketParameters::new(100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put).unwrap()
}

fn bench_qdplus(c: &mut Criterion) {
    let config = EngineConfig::default();
    let single = benchmark_put();
    let double = negative_rate_put();

    c.bench_function("qdplus_single_boundary", |b| {
        b.iter(|| approximate_boundaries(black_box(&single), black_box(&config)).unwrap())
    });
    c.bench_function("qdplus_double_boundary", |b| {
        b.iter(|| approximate_boundaries(black_box(&double), black_box(&config)).unwrap())
    });
}

fn bench_kim_refinement(c: &mut Criterion) {
    let config = EngineConfig::default();
    let params = negative_rate_put();
    let seeds = approximate_boundaries(&params, &config).unwrap();

    c.bench_function("kim_refine_double_boundary", |b| {
        b.iter(|| refine_boundaries(black_box(&params), black_box(&seeds), black_box(&config)).unwrap())
    });
}

fn bench_spectral_evaluation(c: &mut Criterion) {
    let config = EngineConfig::default();
    let params = negative_rate_put();
    let seeds = approximate_boundaries(&params, &config).unwrap();
    let refined = refine_boundaries(&params, &seeds, &config).unwrap();
    let boundary = BoundaryFunction::from_samples(
        &refined.upper.taus,
        &refined.upper.values,
        params.strike,
        params.rate,
        params.dividend_yield,
    )
    .unwrap();

    c.bench_function("spectral_evaluate", |b| {
        b.iter(|| boundary.evaluate(black_box(0.37)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_qdplus,
    bench_kim_refinement,
    bench_spectral_evaluation
);
criterion_main!(benches);
