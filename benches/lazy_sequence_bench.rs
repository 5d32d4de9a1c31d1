//! Benchmark for LazySequence pipelines against equivalent std iterator chains.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graham::lazy::LazySequence;
use std::hint::black_box;

// =============================================================================
// map / filter / take Benchmark
// =============================================================================

fn benchmark_map_filter_take(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("map_filter_take");

    for count in [10usize, 1000, 100_000] {
        let pipeline = LazySequence::infinite(0)
            .map(|n| n * 3)
            .filter(|n| n % 2 == 0)
            .take(count);

        group.bench_with_input(
            BenchmarkId::new("LazySequence", count),
            &pipeline,
            |bencher, pipeline| {
                bencher.iter(|| black_box(pipeline.reduce(0i64, |sum, n| sum.wrapping_add(n))));
            },
        );

        group.bench_with_input(BenchmarkId::new("Iterator", count), &count, |bencher, &count| {
            bencher.iter(|| {
                black_box(
                    (0i64..)
                        .map(|n| n * 3)
                        .filter(|n| n % 2 == 0)
                        .take(count)
                        .fold(0i64, |sum, n| sum.wrapping_add(n)),
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// scan Benchmark
// =============================================================================

fn benchmark_scan(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("scan");

    for count in [1000usize, 100_000] {
        let totals = LazySequence::infinite(1)
            .scan(0i64, |total, n| total.wrapping_add(n))
            .take(count);

        group.bench_with_input(
            BenchmarkId::new("LazySequence", count),
            &totals,
            |bencher, totals| {
                bencher.iter(|| black_box(totals.to_list()));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Pipeline construction Benchmark
// =============================================================================

fn benchmark_build(criterion: &mut Criterion) {
    criterion.bench_function("build_20_stages", |bencher| {
        bencher.iter(|| {
            let mut sequence = LazySequence::range(0, 100, 1);
            for offset in 0..20 {
                sequence = sequence.map(move |n| n + black_box(offset));
            }
            black_box(sequence)
        });
    });
}

criterion_group!(
    benches,
    benchmark_map_filter_take,
    benchmark_scan,
    benchmark_build
);
criterion_main!(benches);
