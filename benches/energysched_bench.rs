//! Criterion benchmarks for u-energysched.
//!
//! Uses synthetic single-machine instances with a seeded price curve to
//! measure table derivation, fixed-order evaluation and the local search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_energysched::extended::ExtendedInstance;
use u_energysched::fixed_order::FixedOrderEvaluator;
use u_energysched::local_search::{LocalSearchConfig, LocalSearchRunner};
use u_energysched::model::{Instance, StateDiagram};

// ===========================================================================
// Synthetic instances
// ===========================================================================

fn synthetic(jobs: usize, intervals: usize, diagram: StateDiagram) -> Instance {
    let mut rng = StdRng::seed_from_u64(42);
    let processing: Vec<i64> = (0..jobs).map(|_| rng.random_range(1..6)).collect();
    let costs: Vec<i64> = (0..intervals).map(|_| rng.random_range(1..20)).collect();
    Instance::single_machine(&processing, &costs, diagram)
}

fn prepared(jobs: usize, intervals: usize) -> ExtendedInstance {
    let mut ext = ExtendedInstance::new(synthetic(jobs, intervals, StateDiagram::benedikt2020a()))
        .expect("synthetic instance is valid");
    ext.generate_full();
    ext
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_switching_costs(c: &mut Criterion) {
    let mut group = c.benchmark_group("switching_costs");
    group.sample_size(10);

    for &intervals in &[50usize, 100, 200] {
        let instance = synthetic(10, intervals, StateDiagram::benedikt2020a());
        group.bench_with_input(BenchmarkId::from_parameter(intervals), &instance, |b, inst| {
            b.iter(|| {
                let mut ext = ExtendedInstance::new(black_box(inst.clone())).expect("valid");
                ext.compute_optimal_switching_costs();
                black_box(ext)
            })
        });
    }
    group.finish();
}

fn bench_fixed_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_order");

    for (jobs, intervals) in [(10usize, 100usize), (30, 200)] {
        let ext = prepared(jobs, intervals);
        let order = ext.jobs().to_vec();
        let mut evaluator = FixedOrderEvaluator::new(&ext).expect("tables computed");
        group.bench_function(BenchmarkId::new(format!("j{jobs}_i{intervals}"), jobs), |b| {
            b.iter(|| black_box(evaluator.evaluate(black_box(&order), None)))
        });
    }
    group.finish();
}

fn bench_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");
    group.sample_size(10);

    for &jobs in &[10usize, 20] {
        let ext = prepared(jobs, 150);
        let config = LocalSearchConfig::default()
            .with_max_iterations(20)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(jobs), &config, |b, cfg| {
            b.iter(|| black_box(LocalSearchRunner::run(black_box(&ext), cfg)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_switching_costs, bench_fixed_order, bench_local_search);
criterion_main!(benches);
