//! Benchmarks for bitmex-l2-book.
//!
//! - **store_bench**: Operation apply and resnapshot cost
//! - **ladder_bench**: Ladder and spread derivation, memo hits and misses


use criterion::{criterion_group, criterion_main};

// OrderBookStore benchmarks
criterion_group!(
    store_benches,
    store_bench::store_operations,
    store_bench::store_scaling,
);

// Ladder and spread benchmarks
criterion_group!(
    ladder_benches,
    ladder_bench::ladder_operations,
    ladder_bench::view_scaling,
);

criterion_main!(store_benches, ladder_benches);
