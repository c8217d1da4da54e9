//! Benchmarks for row index lookups and span geometry.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use cellgrid::{Column, Grid, GridConfig, ItemId, ItemTree};
use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};

/// `roots` root rows with `per_root` children each, all expanded.
fn build_tree(roots: usize, per_root: usize) -> (Grid, Vec<ItemId>) {
    let mut grid = Grid::new(&GridConfig::default());
    for width in [120, 80, 80, 60] {
        grid.add_column(Column::new(width)).expect("Failed to add column");
    }
    let mut items = Vec::with_capacity(roots * (per_root + 1));
    for _ in 0..roots {
        let root = grid.insert_item(None, None).expect("Failed to insert");
        items.push(root);
        for _ in 0..per_root {
            items.push(grid.insert_item(Some(root), None).expect("Failed to insert"));
        }
        grid.set_expanded(root, true).expect("Failed to expand");
    }
    (grid, items)
}

/// Cached lookups after one warm pass
fn bench_row_index_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_index_hit");
    for roots in [10, 100, 1000] {
        let (grid, items) = build_tree(roots, 9);
        for item in &items {
            grid.tree().row_index(*item).expect("Failed to index");
        }
        let last = items[items.len() - 1];
        group.bench_with_input(BenchmarkId::from_parameter(items.len()), &last, |b, item| {
            b.iter(|| grid.tree().row_index(black_box(*item)).expect("Failed to index"))
        });
    }
    group.finish();
}

/// Lookups right after the cache was dropped
fn bench_row_index_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_index_miss");
    for roots in [10, 100, 1000] {
        let (grid, items) = build_tree(roots, 9);
        let last = items[items.len() - 1];
        group.bench_with_input(BenchmarkId::from_parameter(items.len()), &last, |b, item| {
            b.iter(|| {
                grid.tree().invalidate_row_indices();
                grid.tree().row_index(black_box(*item)).expect("Failed to index")
            })
        });
    }
    group.finish();
}

/// Appending rows one by one; time per row should stay flat as the tree grows
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_roots");
    group.sample_size(10);
    for rows in [10_000usize, 40_000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, rows| {
            b.iter_batched(
                ItemTree::default,
                |mut tree| {
                    for _ in 0..*rows {
                        tree.insert(None, None).expect("Failed to insert");
                    }
                    tree
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Cell size with a span covering every column and ten rows
fn bench_cell_size_spanned(c: &mut Criterion) {
    let (mut grid, items) = build_tree(100, 9);
    let item = items[0];
    grid.set_column_span(item, 0, 3).expect("Failed to span");
    grid.set_row_span(item, 0, 9).expect("Failed to span");

    c.bench_function("cell_size_spanned", |b| {
        b.iter(|| grid.cell_size(black_box(item), 0).expect("Failed to size"))
    });
}

criterion_group!(
    benches,
    bench_row_index_hit,
    bench_row_index_miss,
    bench_append,
    bench_cell_size_spanned,
);

criterion_main!(benches);
