use criterion::{BenchmarkId, Criterion};
use orderbook_impact::{BookUpdate, OrderBook, UpdateMode};
use std::hint::black_box;

fn ladder(levels: usize, start: f64, step: f64) -> Vec<(f64, f64)> {
    (0..levels)
        .map(|i| (start + i as f64 * step, 1.0 + (i % 7) as f64))
        .collect()
}

fn populated_book(levels: usize) -> OrderBook {
    let book = OrderBook::new("BENCH");
    let update = BookUpdate::from_pairs(
        &ladder(levels, 100.5, 0.5),
        &ladder(levels, 100.0, -0.01),
    )
    .unwrap_or_default();
    book.apply_update(&update);
    book
}

/// Register benchmarks for merging feed updates into the book.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Apply Update");

    // Typical incremental message: a handful of deltas on a deep book
    for &depth in &[50, 400, 5_000] {
        let update = BookUpdate::from_pairs(
            &[(100.5, 3.0), (101.0, 0.0), (102.5, 7.0)],
            &[(100.0, 2.0), (99.99, 0.0), (99.5, 4.0)],
        )
        .unwrap_or_default();

        group.bench_with_input(
            BenchmarkId::new("delta_merge", depth),
            &depth,
            |b, &depth| {
                let book = populated_book(depth);
                b.iter(|| book.apply(black_box(&update), UpdateMode::DeltaMerge));
            },
        );
    }

    // Full-book message replacing everything
    for &depth in &[50, 400] {
        let update = BookUpdate::from_pairs(
            &ladder(depth, 100.5, 0.5),
            &ladder(depth, 100.0, -0.01),
        )
        .unwrap_or_default();

        group.bench_with_input(
            BenchmarkId::new("snapshot_replace", depth),
            &depth,
            |b, &depth| {
                let book = populated_book(depth);
                b.iter(|| book.apply(black_box(&update), UpdateMode::SnapshotReplace));
            },
        );
    }

    group.finish();
}
