//! Criterion benchmarks for the pricing orchestrator.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pricer_boundary::{MarketParameters, OptionSide};
use pricer_pricing::engine::AmericanOptionEngine;
use pricer_pricing::greeks::{compute_greeks, GreeksConfig};

fn bench_single_boundary_price(c: &mut Criterion) {
    let engine = AmericanOptionEngine::with_defaults();
    let params =
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();

    c.bench_function("price_single_boundary_put", |b| {
        b.iter(|| engine.price(black_box(&params)).unwrap())
    });
}

fn bench_double_boundary_price(c: &mut Criterion) {
    let engine = AmericanOptionEngine::with_defaults();
    let params =
        MarketParameters::new(100.0, 100.0, 1.0, -0.01, -0.02, 0.10, OptionSide::Put).unwrap();

    c.bench_function("price_double_boundary_put", |b| {
        b.iter(|| engine.price(black_box(&params)).unwrap())
    });
}

fn bench_greeks_sweep(c: &mut Criterion) {
    let engine = AmericanOptionEngine::with_defaults();
    let params =
        MarketParameters::new(36.0, 40.0, 1.0, 0.06, 0.02, 0.20, OptionSide::Put).unwrap();
    let config = GreeksConfig::default();

    c.bench_function("greeks_bump_and_reprice", |b| {
        b.iter(|| compute_greeks(&engine, black_box(&params), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_single_boundary_price,
    bench_double_boundary_price,
    bench_greeks_sweep
);
criterion_main!(benches);
