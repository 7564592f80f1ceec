//! Tests for the per-axis metadata cache and offset resolution.
//!
//! Offsets come from arbitrary host size callbacks, so the cache measures
//! lazily: everything past the measurement frontier is estimated until a
//! query forces it to resolve. These tests drive the cache both directly
//! and through the grid handle.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use gridview::layout::AxisLayout;
use gridview::{CellCoordinate, GridConfig};

fn uniform(size: f32) -> impl Fn(u32) -> f32 {
    move |_| size
}

#[test]
fn test_lazy_measurement_stops_at_queried_index() {
    let mut axis = AxisLayout::new(25.0);
    assert_eq!(axis.last_measured(), None);

    axis.offset(40, &uniform(10.0));
    assert_eq!(axis.last_measured(), Some(40));
    // Beyond the frontier the estimate still answers
    assert_eq!(axis.size(41), 25.0);
    assert_eq!(axis.size(40), 10.0);
}

#[test]
fn test_offsets_accumulate_variable_sizes() {
    let sizes = |i: u32| if i % 2 == 0 { 20.0 } else { 30.0 };
    let mut axis = AxisLayout::new(25.0);
    // Rows 0..4: 20 + 30 + 20 + 30
    assert_eq!(axis.offset(4, &sizes), 100.0);
    assert_eq!(axis.offset(0, &sizes), 0.0);
    assert_eq!(axis.offset(1, &sizes), 20.0);
}

#[test]
fn test_estimated_total_converges_to_exact() {
    let measure = uniform(17.0);
    let mut axis = AxisLayout::new(40.0);
    // Unmeasured: pure estimate
    assert_eq!(axis.estimated_total_size(100), 4000.0);
    // Half measured: exact prefix + estimated suffix
    axis.offset(49, &measure);
    assert_eq!(axis.estimated_total_size(100), 50.0 * 17.0 + 50.0 * 40.0);
    // Fully measured: exact
    axis.offset(99, &measure);
    assert_eq!(axis.estimated_total_size(100), 1700.0);
}

#[test]
fn test_invalidate_then_remeasure_converges() {
    let measure = uniform(20.0);
    let mut axis = AxisLayout::new(20.0);
    axis.offset(50, &measure);
    let before = axis.offset(30, &measure);

    axis.invalidate(10);
    assert_eq!(axis.last_measured(), Some(9));
    // Same callback: re-measurement reproduces the same offsets
    assert_eq!(axis.offset(30, &measure), before);
    assert_eq!(axis.last_measured(), Some(30));
}

#[test]
fn test_index_at_offset_boundary_belongs_to_next_item() {
    let mut axis = AxisLayout::new(20.0);
    let m = uniform(20.0);
    // Offset 200 is the leading edge of item 10
    assert_eq!(axis.index_at_offset(200.0, 1000, &m), Some(10));
    assert_eq!(axis.index_at_offset(199.0, 1000, &m), Some(9));
    assert_eq!(axis.index_at_offset(0.0, 1000, &m), Some(0));
}

#[test]
fn test_grid_resize_rows_shifts_following_offsets() {
    let heights = std::rc::Rc::new(std::cell::Cell::new(20.0f32));
    let h = std::rc::Rc::clone(&heights);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        row_height: Box::new(move |_| h.get()),
        ..GridConfig::default()
    });

    assert_eq!(grid.get_row_offset(10), Some(200.0));

    // Host reports new sizes and invalidates from row 0
    heights.set(30.0);
    grid.resize_rows(&[0]);
    assert_eq!(grid.get_row_offset(10), Some(300.0));
    assert_eq!(grid.get_row_height(10), Some(30.0));
}

#[test]
fn test_scale_applies_to_handle_geometry() {
    let mut grid = common::uniform_grid(100, 10);
    grid.set_scale(2.0);
    assert_eq!(grid.get_row_offset(10), Some(400.0));
    assert_eq!(grid.get_column_width(0), Some(128.0));
    // Scaled content halves the visible window
    let vp = grid.get_viewport();
    assert_eq!(vp.visible_row_stop_index, 9);
}

#[test]
fn test_out_of_range_geometry_queries_are_none() {
    let mut grid = common::uniform_grid(10, 10);
    assert_eq!(grid.get_row_offset(10), None);
    assert_eq!(grid.get_column_offset(10), None);
    assert_eq!(grid.get_cell_bounds(CellCoordinate::new(10, 0)), None);
    assert_eq!(grid.get_cell_offset_from_coords(CellCoordinate::new(10, 0)), None);
}

#[test]
fn test_single_cell_rect_matches_axis_geometry() {
    let mut grid = common::uniform_grid(100, 10);
    let rect = grid
        .get_cell_offset_from_coords(CellCoordinate::new(3, 2))
        .unwrap();
    assert_eq!(rect.x, 128.0);
    assert_eq!(rect.y, 60.0);
    assert_eq!(rect.width, 64.0);
    assert_eq!(rect.height, 20.0);
}

#[test]
fn test_empty_grid_renders_nothing() {
    let mut grid = common::uniform_grid(0, 0);
    let (cells, overlay) = common::render(&mut grid);
    assert!(cells.cells.is_empty());
    assert!(overlay.regions.is_empty());
    assert_eq!(cells.frames.len(), 1);
    assert_eq!(cells.ended, 1);
}

#[test]
fn test_recalc_queue_survives_until_render() {
    let mut grid = common::uniform_grid(100, 10);
    grid.resize_columns(&[2, 5]);
    grid.resize_rows(&[1]);
    assert_eq!(grid.pending_recalc(), (&[1][..], &[2, 5][..]));

    let _ = common::render(&mut grid);
    assert_eq!(grid.pending_recalc(), (&[][..], &[][..]));
}

#[test]
fn test_grid_construction_is_lazy() {
    // A huge axis costs nothing until queried
    let mut grid = common::uniform_grid(10_000_000, 1000);
    let vp = grid.get_viewport();
    assert_eq!(vp.visible_row_start_index, 0);
    // Only the visible window (plus overscan) has been measured
    assert!(grid.get_row_offset(25).is_some());
}
