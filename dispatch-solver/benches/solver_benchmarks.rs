//! Criterion benchmarks for the greedy dispatcher.
//!
//! Measures solve time across fleet sizes with a pre-computed matrix so only
//! the in-memory pipeline is timed.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package dispatch-solver
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dispatch_core::test_support::FixedMatrixProvider;
use dispatch_solver::solve;


use bench_support::{BENCHMARK_SEED, generate_matrix, generate_snapshot};

/// Problem sizes to benchmark as (workers, orders).
const PROBLEM_SIZES: &[(usize, usize)] = &[(5, 50), (10, 100), (20, 200)];

/// Benchmark solve times for various fleet sizes.
fn bench_solve_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_time");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(10));

    for &(workers, orders) in PROBLEM_SIZES {
        // Pre-generate inputs outside the benchmark loop.
        #[expect(clippy::expect_used, reason = "Generated ids are unique by construction")]
        let snapshot = generate_snapshot(workers, orders, BENCHMARK_SEED)
            .expect("benchmark snapshot should build");
        let (durations, distances) = generate_matrix(&snapshot);
        let provider = FixedMatrixProvider::from_durations(durations).with_distances(distances);

        #[expect(
            clippy::as_conversions,
            reason = "Safe conversion for small problem sizes"
        )]
        let throughput_size = orders as u64;
        group.throughput(Throughput::Elements(throughput_size));
        group.bench_with_input(
            BenchmarkId::new("orders", format!("{workers}x{orders}")),
            &orders,
            |b, _| {
                b.iter(|| {
                    #[expect(
                        clippy::let_underscore_must_use,
                        reason = "Benchmarking solve performance, result is intentionally discarded"
                    )]
                    let _ = solve(&snapshot, &provider);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_solve_times);
criterion_main!(benches);
