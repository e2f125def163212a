//! Criterion benchmarks for u-qubo.
//!
//! Measures model compilation, annealing reads on the bundled problems, and
//! the two quadratic sorts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use u_qubo::problems::idle_time::IdleTimeProblem;
use u_qubo::problems::tsp::{TspConfig, TspProblem};
use u_qubo::sampler::{SamplerConfig, SimulatedAnnealingSampler};
use u_qubo::sort::{bubble_sort, selection_sort};

// ===========================================================================
// Compilation
// ===========================================================================

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("idle_time", |b| {
        let problem = IdleTimeProblem::default();
        b.iter(|| black_box(problem.create_qubo()))
    });
    group.bench_function("tsp", |b| {
        b.iter(|| black_box(TspProblem::new(black_box(TspConfig::default()))))
    });
    group.finish();
}

// ===========================================================================
// Sampling
// ===========================================================================

fn bench_sample_tsp(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_tsp");
    group.sample_size(10);

    let problem = TspProblem::new(TspConfig::default()).unwrap();
    let qubo = problem
        .model()
        .to_qubo(&problem.feed_dict(200.0, 200.0))
        .unwrap();

    for &sweeps in &[100, 1000, 10_000] {
        let sampler = SimulatedAnnealingSampler::new(
            SamplerConfig::default()
                .with_num_reads(10)
                .with_num_sweeps(sweeps)
                .with_seed(42)
                .with_parallel(false),
        );
        group.bench_with_input(BenchmarkId::from_parameter(sweeps), &sampler, |b, s| {
            b.iter(|| black_box(s.sample_qubo(black_box(&qubo))))
        });
    }
    group.finish();
}

fn bench_sample_idle_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_idle_time");
    group.sample_size(10);

    let qubo = IdleTimeProblem::default().create_qubo().unwrap();
    for &parallel in &[false, true] {
        let sampler = SimulatedAnnealingSampler::new(
            SamplerConfig::default()
                .with_num_reads(100)
                .with_num_sweeps(1000)
                .with_seed(42)
                .with_parallel(parallel),
        );
        let id = if parallel { "parallel" } else { "serial" };
        group.bench_with_input(BenchmarkId::from_parameter(id), &sampler, |b, s| {
            b.iter(|| black_box(s.sample_qubo(black_box(&qubo))))
        });
    }
    group.finish();
}

// ===========================================================================
// Sorting
// ===========================================================================

fn bench_sorts(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for &n in &[10, 100, 1000] {
        let mut data: Vec<i64> = (0..n).collect();
        data.shuffle(&mut StdRng::seed_from_u64(7));

        group.bench_with_input(BenchmarkId::new("bubble", n), &data, |b, d| {
            b.iter(|| {
                let mut v = d.clone();
                bubble_sort(black_box(&mut v));
                v
            })
        });
        group.bench_with_input(BenchmarkId::new("selection", n), &data, |b, d| {
            b.iter(|| {
                let mut v = d.clone();
                selection_sort(black_box(&mut v));
                v
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_sample_tsp,
    bench_sample_idle_time,
    bench_sorts
);
criterion_main!(benches);
