use criterion::{BenchmarkId, Criterion};
use orderbook_impact::{BookUpdate, OrderBook};
use std::hint::black_box;

/// Register benchmarks for reads taken under the book lock.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Reads");

    for &depth in &[50, 400, 5_000] {
        let book = OrderBook::new("BENCH");
        let asks: Vec<(f64, f64)> = (0..depth)
            .map(|i| (100.5 + i as f64 * 0.5, 2.0))
            .collect();
        let bids: Vec<(f64, f64)> = (0..depth)
            .map(|i| (100.0 - i as f64 * 0.01, 2.0))
            .collect();
        book.apply_update(&BookUpdate::from_pairs(&asks, &bids).unwrap_or_default());

        group.bench_with_input(BenchmarkId::new("snapshot", depth), &depth, |b, _| {
            b.iter(|| black_box(book.snapshot()));
        });

        group.bench_with_input(BenchmarkId::new("mid_price", depth), &depth, |b, _| {
            b.iter(|| black_box(book.mid_price()));
        });

        group.bench_with_input(BenchmarkId::new("top_levels_10", depth), &depth, |b, _| {
            b.iter(|| black_box(book.top_levels(10)));
        });
    }

    group.finish();
}
