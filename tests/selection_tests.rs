//! Tests for pointer and keyboard selection driven through the grid
//! handle: gestures enter as container pixels and key names, results are
//! observed via the region list, host callbacks, and emitted events.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use gridview::selection::SelectionEvent;
use gridview::{
    AreaBounds, CellCoordinate, GridCallbacks, GridConfig, GridEvent, KeyModifiers,
    SelectionPolicy,
};
use std::cell::RefCell;
use std::rc::Rc;

fn cell(r: u32, c: u32) -> CellCoordinate {
    CellCoordinate::new(r, c)
}

/// Container pixel at the center of a cell in the uniform 20x64 matrix.
fn px(r: u32, c: u32) -> (f32, f32) {
    (c as f32 * 64.0 + 32.0, r as f32 * 20.0 + 10.0)
}

const NONE: KeyModifiers = KeyModifiers {
    shift: false,
    ctrl: false,
    meta: false,
    alt: false,
};

const SHIFT: KeyModifiers = KeyModifiers {
    shift: true,
    ..NONE
};

const CTRL: KeyModifiers = KeyModifiers { ctrl: true, ..NONE };

const META: KeyModifiers = KeyModifiers { meta: true, ..NONE };

#[test]
fn test_plain_click_selects_single_cell() {
    let mut grid = common::uniform_grid(100, 10);
    let (x, y) = px(3, 2);
    grid.pointer_down(x, y, NONE);
    grid.pointer_up();
    assert_eq!(grid.active_cell(), Some(cell(3, 2)));
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::single(cell(3, 2)))
    );
}

#[test]
fn test_drag_select_extends_and_reports_end() {
    let ends = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&ends);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        selection_policy: SelectionPolicy::Multiple,
        callbacks: GridCallbacks {
            on_selection_end: Some(Box::new(move |anchor, focus| {
                sink.borrow_mut().push((anchor, focus));
            })),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });

    let (x0, y0) = px(1, 1);
    let (x1, y1) = px(4, 2);
    grid.pointer_down(x0, y0, NONE);
    grid.pointer_move(x1, y1);
    assert!(grid.selection().regions().last().unwrap().in_progress);

    grid.pointer_up();
    assert!(!grid.selection().regions().last().unwrap().in_progress);
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(1, 1, 4, 2))
    );
    assert_eq!(*ends.borrow(), vec![(cell(1, 1), cell(4, 2))]);
}

#[test]
fn test_shift_click_extends_from_anchor() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(2, 2);
    grid.pointer_down(x0, y0, NONE);
    grid.pointer_up();

    let (x1, y1) = px(6, 4);
    grid.pointer_down(x1, y1, SHIFT);
    grid.pointer_up();
    assert_eq!(grid.selection().regions().len(), 1);
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(2, 2, 6, 4))
    );
}

#[test]
fn test_meta_click_appends_then_toggles_off() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(2, 2);
    grid.pointer_down(x0, y0, NONE);
    grid.pointer_up();

    let (x1, y1) = px(5, 1);
    grid.pointer_down(x1, y1, META);
    grid.pointer_up();
    assert_eq!(grid.selection().regions().len(), 2);
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::single(cell(5, 1)))
    );

    // Second meta-click removes the matching single-cell region
    grid.pointer_down(x1, y1, META);
    assert_eq!(grid.selection().regions().len(), 1);
    assert_eq!(grid.active_cell(), Some(cell(5, 1)));
}

#[test]
fn test_drag_move_translates_region_and_fires_callback() {
    let moved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&moved);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        selection_policy: SelectionPolicy::Multiple,
        callbacks: GridCallbacks {
            on_segment_move: Some(Box::new(move |from, to| {
                sink.borrow_mut().push((from, to));
            })),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });

    let (x0, y0) = px(2, 2);
    let (x1, y1) = px(4, 4);
    grid.pointer_down(x0, y0, NONE);
    grid.pointer_move(x1, y1);
    grid.pointer_up();

    // Grab the region body at (3,3) and pull it toward the corner; the
    // translation clamps at the last column without resizing
    let (gx, gy) = px(3, 3);
    grid.begin_drag(gx, gy);
    let (mx, my) = px(8, 8);
    grid.pointer_move(mx, my);
    grid.pointer_up();

    let from = AreaBounds::new(2, 2, 4, 4);
    let to = AreaBounds::new(7, 7, 9, 9);
    assert_eq!(*moved.borrow(), vec![(from, to)]);
    assert_eq!(grid.selection().last_bounds(), Some(to));
    // Active cell keeps its offset inside the moved region
    assert_eq!(grid.active_cell(), Some(cell(7, 7)));
}

#[test]
fn test_drag_move_released_in_place_commits_nothing() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(2, 2);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(4, 4);
    grid.pointer_move(x1, y1);
    grid.pointer_up();

    let (gx, gy) = px(3, 3);
    grid.begin_drag(gx, gy);
    grid.pointer_up();
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(2, 2, 4, 4))
    );
}

#[test]
fn test_fill_grows_dominant_axis_and_fires_callback() {
    let fills = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fills);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        selection_policy: SelectionPolicy::Multiple,
        callbacks: GridCallbacks {
            on_fill: Some(Box::new(move |target, source| {
                sink.borrow_mut().push((target, source));
            })),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });

    let (x0, y0) = px(2, 2);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(3, 3);
    grid.pointer_move(x1, y1);
    grid.pointer_up();

    grid.begin_fill();
    // Pointer below and slightly right: the vertical excursion wins
    let (fx, fy) = px(7, 4);
    grid.pointer_move(fx, fy);
    grid.pointer_up();

    let source = AreaBounds::new(2, 2, 3, 3);
    let target = AreaBounds::new(2, 2, 7, 3);
    assert_eq!(*fills.borrow(), vec![(target, source)]);
    assert_eq!(grid.selection().last_bounds(), Some(target));
}

#[test]
fn test_fill_back_into_source_cancels() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(2, 2);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(6, 6);
    grid.pointer_move(x1, y1);
    grid.pointer_up();

    grid.begin_fill();
    let (fx, fy) = px(9, 2);
    grid.pointer_move(fx, fy);
    let (bx, by) = px(4, 4);
    grid.pointer_move(bx, by);
    grid.pointer_up();
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(2, 2, 6, 6))
    );
}

#[test]
fn test_arrow_keys_move_active_cell() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(5, 5));
    assert!(grid.handle_key("ArrowDown", NONE));
    assert_eq!(grid.active_cell(), Some(cell(6, 5)));
    assert!(grid.handle_key("ArrowRight", NONE));
    assert_eq!(grid.active_cell(), Some(cell(6, 6)));
    assert!(grid.handle_key("ArrowUp", NONE));
    assert!(grid.handle_key("ArrowLeft", NONE));
    assert_eq!(grid.active_cell(), Some(cell(5, 5)));
}

#[test]
fn test_shift_arrow_extends_region() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(5, 5));
    grid.handle_key("ArrowDown", SHIFT);
    grid.handle_key("ArrowRight", SHIFT);
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(5, 5, 6, 6))
    );
    // Anchor stays put
    assert_eq!(grid.selection().anchor(), Some(cell(5, 5)));
}

#[test]
fn test_ctrl_arrow_jumps_to_edge() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(5, 5));
    grid.handle_key("ArrowDown", CTRL);
    assert_eq!(grid.active_cell(), Some(cell(99, 5)));
}

#[test]
fn test_keyboard_navigation_skips_hidden_rows() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        is_row_hidden: Some(Box::new(|r| r == 3 || r == 4)),
        ..GridConfig::default()
    });
    grid.select_cell(cell(2, 0));
    grid.handle_key("ArrowDown", NONE);
    assert_eq!(grid.active_cell(), Some(cell(5, 0)));
}

#[test]
fn test_tab_cycles_within_multi_cell_region() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(1, 1);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(2, 2);
    grid.pointer_move(x1, y1);
    grid.pointer_up();
    assert_eq!(grid.active_cell(), Some(cell(1, 1)));

    // Row-major cycle with wrap at the region's end
    for want in [cell(1, 2), cell(2, 1), cell(2, 2), cell(1, 1)] {
        assert!(grid.handle_key("Tab", NONE));
        assert_eq!(grid.active_cell(), Some(want));
    }
    // Region survives the full cycle
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(1, 1, 2, 2))
    );
}

#[test]
fn test_tab_without_region_moves_right() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(4, 4));
    grid.handle_key("Tab", NONE);
    assert_eq!(grid.active_cell(), Some(cell(4, 5)));
    grid.handle_key("Tab", SHIFT);
    assert_eq!(grid.active_cell(), Some(cell(4, 4)));
}

#[test]
fn test_page_keys_move_by_visible_span() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(5, 0));
    // 400px container over 20px rows: visible span is 19
    grid.handle_key("PageDown", NONE);
    assert_eq!(grid.active_cell(), Some(cell(24, 0)));
    grid.handle_key("PageUp", NONE);
    assert_eq!(grid.active_cell(), Some(cell(5, 0)));
}

#[test]
fn test_home_end_and_grid_corners() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(4, 5));
    grid.handle_key("End", NONE);
    assert_eq!(grid.active_cell(), Some(cell(4, 9)));
    grid.handle_key("Home", NONE);
    assert_eq!(grid.active_cell(), Some(cell(4, 0)));

    grid.handle_key("End", CTRL);
    assert_eq!(grid.active_cell(), Some(cell(99, 9)));
    grid.handle_key("Home", CTRL);
    assert_eq!(grid.active_cell(), Some(cell(0, 0)));
}

#[test]
fn test_space_shortcuts_select_row_and_column() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(4, 5));
    assert!(grid.handle_key(" ", SHIFT));
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(4, 0, 4, 9))
    );
    assert_eq!(grid.active_cell(), Some(cell(4, 5)));

    assert!(grid.handle_key(" ", CTRL));
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(0, 5, 99, 5))
    );
}

#[test]
fn test_ctrl_a_selects_whole_grid() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(4, 5));
    assert!(grid.handle_key("a", CTRL));
    assert_eq!(grid.selection().regions().len(), 1);
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(0, 0, 99, 9))
    );
    // Active cell survives select-all
    assert_eq!(grid.active_cell(), Some(cell(4, 5)));
}

#[test]
fn test_selection_events_reach_subscribers() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut grid = common::uniform_grid(100, 10);
    grid.subscribe(move |event, _| {
        if let GridEvent::Selection(SelectionEvent::SelectionEnd { anchor, focus }) = event {
            sink.borrow_mut().push((*anchor, *focus));
        }
    });

    let (x0, y0) = px(0, 0);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(2, 1);
    grid.pointer_move(x1, y1);
    grid.pointer_up();
    assert_eq!(*seen.borrow(), vec![(cell(0, 0), cell(2, 1))]);
}

#[test]
fn test_merged_span_pulled_in_whole() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        merged_cells: vec![AreaBounds::new(2, 2, 4, 4)],
        ..GridConfig::default()
    });
    grid.select_cell(cell(1, 1));
    grid.handle_key("ArrowDown", SHIFT);
    // (1,1)-(2,1) misses the merge
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(1, 1, 2, 1))
    );
    grid.handle_key("ArrowRight", SHIFT);
    // Touching (2,2) pulls in the whole merged span
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(1, 1, 4, 4))
    );
}
