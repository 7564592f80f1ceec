//! Benchmarks for the virtualization hot paths: offset resolution,
//! offset-to-index hit testing, window computation, and the per-frame
//! render walk.
//!
//! Run with: cargo bench --bench virtualization
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use gridview::error::Result;
use gridview::layout::AxisLayout;
use gridview::render::{CellDrawParams, CellDrawer, RegionDrawParams, SelectionRenderer};
use gridview::{Grid, GridConfig};

fn variable(i: u32) -> f32 {
    20.0 + (i % 7) as f32
}

// =============================================================================
// Offset resolution
// =============================================================================

fn bench_offset_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis/offset");

    // Cold: measuring forward from an empty cache to the target index
    for count in [1_000u32, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("cold", count), &count, |b, &count| {
            b.iter(|| {
                let mut axis = AxisLayout::new(20.0);
                black_box(axis.offset(count - 1, &variable))
            })
        });
    }

    // Warm: repeated lookups inside the measured prefix
    group.bench_function("warm_lookup", |b| {
        let mut axis = AxisLayout::new(20.0);
        axis.offset(99_999, &variable);
        let mut i = 0u32;
        b.iter(|| {
            i = (i + 7919) % 100_000;
            black_box(axis.offset(i, &variable))
        })
    });

    group.finish();
}

// =============================================================================
// Offset-to-index (hit testing)
// =============================================================================

fn bench_index_at_offset(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis/index_at_offset");

    // Binary search over a fully measured prefix
    group.bench_function("measured", |b| {
        let mut axis = AxisLayout::new(20.0);
        axis.offset(99_999, &variable);
        let mut offset = 0.0f32;
        b.iter(|| {
            offset = (offset + 12_345.0) % 2_000_000.0;
            black_box(axis.index_at_offset(offset, 100_000, &variable))
        })
    });

    // Lazy extension past the frontier
    group.bench_function("extend_frontier", |b| {
        b.iter(|| {
            let mut axis = AxisLayout::new(20.0);
            black_box(axis.index_at_offset(500_000.0, 100_000, &variable))
        })
    });

    group.finish();
}

// =============================================================================
// Visible window
// =============================================================================

fn bench_visible_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis/visible_range");

    group.bench_function("scroll_step", |b| {
        let mut axis = AxisLayout::new(20.0);
        axis.offset(99_999, &variable);
        let mut scroll = 0.0f32;
        b.iter(|| {
            scroll = (scroll + 205.0) % 1_900_000.0;
            black_box(axis.visible_range(scroll, 400.0, 100_000, &variable))
        })
    });

    group.finish();
}

// =============================================================================
// Render walk
// =============================================================================

struct NullDrawer;

impl CellDrawer for NullDrawer {
    fn draw_cell(&mut self, params: &CellDrawParams) -> Result<()> {
        black_box(params);
        Ok(())
    }
}

impl SelectionRenderer for NullDrawer {
    fn draw_region(&mut self, params: &RegionDrawParams) -> Result<()> {
        black_box(params);
        Ok(())
    }

    fn draw_active_cell(&mut self, rect: &gridview::CellRect) -> Result<()> {
        black_box(rect);
        Ok(())
    }
}

fn bench_render_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/render");

    for rows in [10_000u32, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("frame", rows), &rows, |b, &rows| {
            let mut grid = Grid::new(GridConfig {
                row_count: rows,
                column_count: 1_000,
                row_height: Box::new(variable),
                frozen_rows: 1,
                frozen_columns: 1,
                ..GridConfig::default()
            });
            grid.resize(1280.0, 800.0);
            grid.scroll_to(640.0, 2_000.0);
            let mut cells = NullDrawer;
            let mut overlay = NullDrawer;
            b.iter(|| {
                grid.scroll_by(0.0, 21.0);
                grid.render(&mut cells, &mut overlay).unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_offset_resolution,
    bench_index_at_offset,
    bench_visible_window,
    bench_render_walk
);
criterion_main!(benches);
