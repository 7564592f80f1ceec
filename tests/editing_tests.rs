//! Tests for the edit-session lifecycle driven through the grid handle:
//! keystroke and Enter activation, submit-and-move, region-captured Tab
//! movement, blur semantics, and the host callbacks.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use gridview::{
    AreaBounds, CellCoordinate, Direction, GridCallbacks, GridConfig, GridEvent, KeyModifiers,
    SelectionPolicy,
};
use std::cell::RefCell;
use std::rc::Rc;

fn cell(r: u32, c: u32) -> CellCoordinate {
    CellCoordinate::new(r, c)
}

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

#[test]
fn test_make_editable_sizes_to_container_edge() {
    let mut grid = common::uniform_grid(100, 10);
    grid.make_editable(cell(3, 2), None, true, false);
    let session = grid.edit_session().unwrap();
    assert_eq!(session.cell, cell(3, 2));
    assert_eq!(session.rect.x, 128.0);
    assert_eq!(session.rect.y, 60.0);
    assert_eq!(session.rect.width, 64.0);
    assert_eq!(session.rect.height, 20.0);
    // Growth room up to the 400x400 container edge
    assert_eq!(session.max_width, 272.0);
    assert_eq!(session.max_height, 340.0);
    assert!(session.auto_focus);
    assert!(!session.is_dirty);
}

#[test]
fn test_make_editable_covers_merged_span() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        merged_cells: vec![AreaBounds::new(1, 1, 2, 3)],
        ..GridConfig::default()
    });
    grid.make_editable(cell(2, 2), None, true, false);
    let session = grid.edit_session().unwrap();
    assert_eq!(session.rect.x, 64.0);
    assert_eq!(session.rect.y, 20.0);
    assert_eq!(session.rect.width, 192.0);
    assert_eq!(session.rect.height, 40.0);
}

#[test]
fn test_make_editable_rejects_hidden_cell() {
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        is_row_hidden: Some(Box::new(|r| r == 3)),
        ..GridConfig::default()
    });
    grid.make_editable(cell(3, 0), None, true, false);
    assert!(grid.edit_session().is_none());
}

#[test]
fn test_keystroke_seeds_dirty_session() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(1, 1));
    assert!(grid.handle_key("x", NONE));
    let session = grid.edit_session().unwrap();
    assert_eq!(session.value, "x");
    assert!(session.is_dirty);

    grid.set_edit_value("xyz");
    assert_eq!(grid.edit_session().unwrap().value, "xyz");
}

#[test]
fn test_keystroke_without_active_cell_not_consumed() {
    let mut grid = common::uniform_grid(100, 10);
    assert!(!grid.handle_key("x", NONE));
    assert!(grid.edit_session().is_none());
}

#[test]
fn test_enter_submits_down_and_skips_hidden() {
    let submitted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&submitted);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        is_row_hidden: Some(Box::new(|r| r == 2)),
        callbacks: GridCallbacks {
            on_edit_submit: Some(Box::new(move |cell, value| {
                sink.borrow_mut().push((cell, value));
            })),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });
    grid.select_cell(cell(1, 1));
    grid.handle_key("v", NONE);
    assert!(grid.handle_key("Enter", NONE));
    assert_eq!(*submitted.borrow(), vec![(cell(1, 1), "v".to_string())]);
    // Row 2 hidden: the move lands on row 3
    assert_eq!(grid.active_cell(), Some(cell(3, 1)));
}

#[test]
fn test_tab_submit_cycles_within_selected_region() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(1, 1);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(3, 2);
    grid.pointer_move(x1, y1);
    grid.pointer_up();
    assert_eq!(grid.active_cell(), Some(cell(1, 1)));

    // Tab-submit walks the region row-major, keeping it selected
    for want in [cell(1, 2), cell(2, 1), cell(2, 2)] {
        grid.handle_key("x", NONE);
        assert!(grid.handle_key("Tab", NONE));
        assert_eq!(grid.active_cell(), Some(want));
        assert_eq!(
            grid.selection().last_bounds(),
            Some(AreaBounds::new(1, 1, 3, 2))
        );
    }

    // Shift-Tab steps back
    grid.handle_key("x", NONE);
    assert!(grid.handle_key("Tab", SHIFT));
    assert_eq!(grid.active_cell(), Some(cell(2, 1)));
}

#[test]
fn test_enter_submit_wraps_region_column_major() {
    let mut grid = common::uniform_grid(100, 10);
    let (x0, y0) = px(1, 1);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(3, 2);
    grid.pointer_move(x1, y1);
    grid.pointer_up();

    // From the bottom of the first column, Enter wraps to the top of the
    // next column
    grid.make_editable(cell(3, 1), None, true, false);
    grid.submit_edit(Some(Direction::Down));
    assert_eq!(grid.active_cell(), Some(cell(1, 2)));
    assert_eq!(
        grid.selection().last_bounds(),
        Some(AreaBounds::new(1, 1, 3, 2))
    );
}

#[test]
fn test_escape_cancels_and_fires_callback() {
    let cancelled = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&cancelled);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        callbacks: GridCallbacks {
            on_edit_cancel: Some(Box::new(move |cell| sink.borrow_mut().push(cell))),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });
    grid.select_cell(cell(1, 1));
    grid.handle_key("q", NONE);
    assert!(grid.handle_key("Escape", NONE));
    assert!(grid.edit_session().is_none());
    assert_eq!(*cancelled.borrow(), vec![cell(1, 1)]);
    // Active cell untouched
    assert_eq!(grid.active_cell(), Some(cell(1, 1)));
}

#[test]
fn test_blur_submits_dirty_and_cancels_clean() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let submit_log = Rc::clone(&log);
    let cancel_log = Rc::clone(&log);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        callbacks: GridCallbacks {
            on_edit_submit: Some(Box::new(move |_, value| {
                submit_log.borrow_mut().push(format!("submit:{value}"));
            })),
            on_edit_cancel: Some(Box::new(move |_| {
                cancel_log.borrow_mut().push("cancel".to_string());
            })),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });
    grid.select_cell(cell(1, 1));

    // Clean session opened with Enter: blur cancels
    grid.handle_key("Enter", NONE);
    grid.blur();

    // Dirty session: blur submits without moving
    grid.handle_key("x", NONE);
    grid.blur();
    assert_eq!(*log.borrow(), vec!["cancel", "submit:x"]);
    assert_eq!(grid.active_cell(), Some(cell(1, 1)));
}

#[test]
fn test_delete_over_region_reports_bounds() {
    let deleted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&deleted);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        selection_policy: SelectionPolicy::Multiple,
        callbacks: GridCallbacks {
            on_edit_delete: Some(Box::new(move |bounds| sink.borrow_mut().push(bounds))),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });
    let (x0, y0) = px(1, 1);
    grid.pointer_down(x0, y0, NONE);
    let (x1, y1) = px(3, 2);
    grid.pointer_move(x1, y1);
    grid.pointer_up();

    assert!(grid.handle_key("Delete", NONE));
    assert!(grid.edit_session().is_none());
    assert_eq!(*deleted.borrow(), vec![AreaBounds::new(1, 1, 3, 2)]);
}

#[test]
fn test_edit_lifecycle_events_reach_subscribers() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut grid = common::uniform_grid(100, 10);
    grid.subscribe(move |event, _| {
        let tag = match event {
            GridEvent::EditOpened { .. } => "opened",
            GridEvent::EditSubmitted { value, .. } => {
                assert_eq!(value, "x");
                "submitted"
            }
            GridEvent::EditCancelled { .. } => "cancelled",
            _ => return,
        };
        sink.borrow_mut().push(tag);
    });

    grid.select_cell(cell(1, 1));
    grid.handle_key("x", NONE);
    grid.handle_key("Enter", NONE);
    grid.handle_key("Enter", NONE); // reopen at (2,1)
    grid.handle_key("Escape", NONE);
    assert_eq!(*seen.borrow(), vec!["opened", "submitted", "opened", "cancelled"]);
}

#[test]
fn test_reopening_same_cell_keeps_session() {
    let mut grid = common::uniform_grid(100, 10);
    grid.select_cell(cell(1, 1));
    grid.handle_key("a", NONE);
    grid.set_edit_value("abc");
    // A second open on the same cell is a no-op
    grid.make_editable(cell(1, 1), None, true, false);
    assert_eq!(grid.edit_session().unwrap().value, "abc");
}

#[test]
fn test_opening_other_cell_discards_previous_session() {
    let submitted = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&submitted);
    let mut grid = common::grid_with(GridConfig {
        row_count: 100,
        column_count: 10,
        callbacks: GridCallbacks {
            on_edit_submit: Some(Box::new(move |_, _| *sink.borrow_mut() += 1)),
            ..GridCallbacks::default()
        },
        ..GridConfig::default()
    });
    grid.select_cell(cell(1, 1));
    grid.handle_key("x", NONE);
    grid.make_editable(cell(5, 5), None, true, false);
    // The first session is gone without a submit
    assert_eq!(*submitted.borrow(), 0);
    assert_eq!(grid.edit_session().unwrap().cell, cell(5, 5));
}
