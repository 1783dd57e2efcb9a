mod apply_update;
mod snapshot;

use criterion::Criterion;

/// Register all order book benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    apply_update::register_benchmarks(c);
    snapshot::register_benchmarks(c);
}
