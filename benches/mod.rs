use criterion::{criterion_group, criterion_main};

mod order_book;

use engine::register_benchmarks as register_engine_benchmarks;
use execution::register_benchmarks as register_execution_benchmarks;
use order_book::register_benchmarks as register_order_book_benchmarks;

// Define the benchmark groups
criterion_group!(
    benches,
    register_order_book_benchmarks,
    register_execution_benchmarks,
    register_engine_benchmarks,
);

criterion_main!(benches);
