//! Tests for viewport windowing, overscan, frozen bands, and scroll
//! alignment through the grid handle.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use gridview::{Align, CellCoordinate, GridConfig, GridEvent};
use std::cell::RefCell;
use std::rc::Rc;

fn cell(r: u32, c: u32) -> CellCoordinate {
    CellCoordinate::new(r, c)
}

#[test]
fn test_visible_window_tracks_scroll() {
    let mut grid = common::uniform_grid(1000, 100);
    grid.scroll_to(0.0, 205.0);
    let vp = grid.get_viewport();
    // Rows at 20px: [205, 605] covers rows 10..=30
    assert_eq!(vp.visible_row_start_index, 10);
    assert_eq!(vp.visible_row_stop_index, 30);
    // Overscan 1, scrolling forward: one behind, one ahead
    assert_eq!(vp.row_start_index, 9);
    assert_eq!(vp.row_stop_index, 31);
}

#[test]
fn test_overscan_flips_with_scroll_direction() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 1000,
        column_count: 10,
        overscan_count: 5,
        ..GridConfig::default()
    });
    grid.scroll_to(0.0, 1000.0);
    let forward = grid.get_viewport();
    assert_eq!(forward.row_start_index, forward.visible_row_start_index - 1);
    assert_eq!(forward.row_stop_index, forward.visible_row_stop_index + 5);

    grid.scroll_by(0.0, -200.0);
    let backward = grid.get_viewport();
    assert_eq!(
        backward.row_start_index,
        backward.visible_row_start_index - 5
    );
    assert_eq!(backward.row_stop_index, backward.visible_row_stop_index + 1);
}

#[test]
fn test_window_clamped_at_matrix_edges() {
    let mut grid = common::uniform_grid(15, 5);
    grid.scroll_to(10_000.0, 10_000.0);
    let vp = grid.get_viewport();
    assert!(vp.row_stop_index <= 14);
    assert!(vp.column_stop_index <= 4);
    // 15 rows * 20px = 300 < 400 container: everything visible, no scroll
    assert_eq!(grid.scroll_state().scroll_y, 0.0);
}

#[test]
fn test_frozen_bands_render_and_pin() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 1000,
        column_count: 100,
        frozen_rows: 2,
        frozen_columns: 1,
        ..GridConfig::default()
    });
    grid.scroll_to(500.0, 500.0);
    let (cells, _) = common::render(&mut grid);

    // Frozen row cells pinned to the top, frozen column cells to the left
    let corner = cells
        .cells
        .iter()
        .find(|c| c.is_frozen_row && c.is_frozen_column)
        .unwrap();
    assert_eq!(corner.cell, cell(0, 0));
    assert_eq!(corner.rect.x, 0.0);
    assert_eq!(corner.rect.y, 0.0);

    let frozen_col = cells
        .cells
        .iter()
        .find(|c| c.is_frozen_column && !c.is_frozen_row)
        .unwrap();
    assert_eq!(frozen_col.cell.column_index, 0);
    assert_eq!(frozen_col.rect.x, 0.0);
}

#[test]
fn test_scroll_minimum_is_frozen_extent() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 100,
        frozen_rows: 3,
        frozen_columns: 2,
        ..GridConfig::default()
    });
    grid.scroll_to(0.0, 0.0);
    let state = grid.scroll_state();
    assert_eq!(state.scroll_x, 128.0);
    assert_eq!(state.scroll_y, 60.0);
}

#[test]
fn test_scroll_to_item_alignments() {
    let mut grid = common::uniform_grid(1000, 10);

    // Row 50 is far from the initial window, so the first jump lands on
    // the next frame
    grid.scroll_to_item(cell(50, 0), Align::Start);
    grid.on_frame(0.0);
    assert_eq!(grid.scroll_state().scroll_y, 1000.0);

    grid.scroll_to_item(cell(50, 0), Align::End);
    assert_eq!(grid.scroll_state().scroll_y, 620.0);

    grid.scroll_to_item(cell(50, 0), Align::Center);
    assert_eq!(grid.scroll_state().scroll_y, 810.0);
}

#[test]
fn test_smart_alignment_is_noop_when_visible() {
    let mut grid = common::uniform_grid(1000, 10);
    grid.scroll_to(0.0, 200.0);
    grid.scroll_to_item(cell(12, 0), Align::Smart);
    assert_eq!(grid.scroll_state().scroll_y, 200.0);
}

#[test]
fn test_far_target_applies_on_next_frame() {
    let mut grid = common::uniform_grid(100_000, 10);
    grid.scroll_to_item(cell(99_999, 0), Align::End);
    assert_eq!(grid.scroll_state().scroll_y, 0.0);

    assert!(grid.on_frame(16.0));
    // Last row's trailing edge at the viewport bottom
    assert_eq!(grid.scroll_state().scroll_y, 100_000.0 * 20.0 - 400.0);
    let vp = grid.get_viewport();
    assert_eq!(vp.visible_row_stop_index, 99_999);
}

#[test]
fn test_hit_testing_suspended_until_settle() {
    let mut grid = common::uniform_grid(1000, 10);
    assert_eq!(
        grid.get_cell_coords_from_offset(10.0, 10.0, true),
        Some(cell(0, 0))
    );

    grid.on_scroll_event(0.0, 100.0, 0.0);
    assert!(grid.is_scrolling());
    assert_eq!(grid.get_cell_coords_from_offset(10.0, 10.0, true), None);

    // Still within the settle delay
    assert!(!grid.on_frame(50.0));
    assert!(grid.is_scrolling());

    assert!(grid.on_frame(150.0));
    assert!(!grid.is_scrolling());
    assert_eq!(
        grid.get_cell_coords_from_offset(10.0, 10.0, true),
        Some(cell(5, 0))
    );
}

#[test]
fn test_hit_test_misses_outside_content() {
    let mut grid = common::uniform_grid(10, 5);
    // Content is 320 wide by 200 tall; pixel beyond both
    assert_eq!(grid.get_cell_coords_from_offset(350.0, 350.0, true), None);
    assert_eq!(grid.get_cell_coords_from_offset(-1.0, 10.0, true), None);
}

#[test]
fn test_wheel_events_coalesce_within_interval() {
    let mut grid = common::uniform_grid(1000, 10);
    grid.handle_wheel(0.0, 60.0, 0.0);
    grid.handle_wheel(0.0, 60.0, 20.0);
    grid.handle_wheel(0.0, 60.0, 79.0);
    // One applied scroll per interval; the rest held, not dropped
    assert_eq!(grid.scroll_state().scroll_y, 60.0);

    grid.handle_wheel(0.0, 60.0, 80.0);
    assert_eq!(grid.scroll_state().scroll_y, 240.0);
}

#[test]
fn test_throttled_wheel_deltas_flush_on_frame() {
    let mut grid = common::uniform_grid(1000, 10);
    for t in [0.0, 10.0, 20.0, 30.0, 40.0] {
        grid.handle_wheel(0.0, 60.0, t);
    }
    assert_eq!(grid.scroll_state().scroll_y, 60.0);

    // No further wheel events: the held 240px drains on the next frame
    // past the snap interval
    assert!(grid.on_frame(100.0));
    assert_eq!(grid.scroll_state().scroll_y, 300.0);
}

#[test]
fn test_scroll_events_reach_subscribers_lifo() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut grid = common::uniform_grid(1000, 10);
    for tag in ["first", "second"] {
        let order = Rc::clone(&order);
        grid.subscribe(move |event, _| {
            if matches!(event, GridEvent::Scrolled { .. }) {
                order.borrow_mut().push(tag);
            }
        });
    }
    grid.scroll_to(0.0, 40.0);
    assert_eq!(*order.borrow(), vec!["second", "first"]);
}

#[test]
fn test_stop_propagation_halts_later_handlers() {
    let seen = Rc::new(RefCell::new(0));
    let mut grid = common::uniform_grid(1000, 10);
    {
        let seen = Rc::clone(&seen);
        grid.subscribe(move |_, _| *seen.borrow_mut() += 1);
    }
    grid.subscribe(|_, propagation| propagation.stop());
    grid.scroll_to(0.0, 40.0);
    // The stopper registered last runs first and halts emission
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn test_scroll_state_round_trip() {
    let mut grid = common::uniform_grid(1000, 100);
    grid.scroll_to(320.0, 640.0);
    let saved = grid.scroll_state();

    let mut restored = common::uniform_grid(1000, 100);
    restored.set_scroll_state(saved);
    assert_eq!(restored.scroll_state(), saved);
    assert_eq!(
        restored.get_viewport().visible_row_start_index,
        grid.get_viewport().visible_row_start_index
    );
}
