//! Grid configuration.
//!
//! Callback-heavy by design: sizing, visibility, and event hooks are all
//! host-supplied closures with documented defaults, resolved once when the
//! grid is constructed.

use super::cell::{AreaBounds, CellCoordinate};
use super::selection::SelectionPolicy;

/// Per-index size getter (row height or column width), in unscaled pixels.
pub type SizeFn = Box<dyn Fn(u32) -> f32>;

/// Per-index visibility predicate. Hidden indices are skipped by keyboard
/// navigation and rejected as selection targets.
pub type HiddenFn = Box<dyn Fn(u32) -> bool>;

/// Fired when a pointer-driven selection gesture ends; carries the anchor
/// and focus cells of the finished region.
pub type SelectionEndFn = Box<dyn FnMut(CellCoordinate, CellCoordinate)>;

/// Fired when a fill-handle drag commits, before the region list is updated.
/// Arguments: fill target, source selection it grew from.
pub type FillFn = Box<dyn FnMut(AreaBounds, AreaBounds)>;

/// Fired when a drag-move commits. Arguments: source bounds, destination.
pub type MoveFn = Box<dyn FnMut(AreaBounds, AreaBounds)>;

/// Fired when an edit session submits. Arguments: cell, value.
pub type SubmitFn = Box<dyn FnMut(CellCoordinate, String)>;

/// Fired when Delete/Backspace clears the active selection without opening
/// an edit session. Argument: the affected bounds.
pub type DeleteFn = Box<dyn FnMut(AreaBounds)>;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Default column width in pixels.
pub const DEFAULT_COL_WIDTH: f32 = 64.0;

/// Default overscan beyond the visible window, in rows/columns.
pub const DEFAULT_OVERSCAN: u32 = 1;

/// Event hooks. All optional; a missing hook is simply not called.
#[derive(Default)]
pub struct GridCallbacks {
    pub on_selection_end: Option<SelectionEndFn>,
    pub on_fill: Option<FillFn>,
    pub on_segment_move: Option<MoveFn>,
    pub on_edit_submit: Option<SubmitFn>,
    pub on_edit_cancel: Option<Box<dyn FnMut(CellCoordinate)>>,
    pub on_edit_delete: Option<DeleteFn>,
}

/// Grid construction parameters.
///
/// Every field has a default; hosts override only what they need:
///
/// - `row_count` / `column_count` — matrix dimensions (default 0).
/// - `row_height` / `column_width` — measured size callbacks; the metadata
///   cache treats their results as authoritative (defaults: 20 / 64).
/// - `estimated_row_height` / `estimated_column_width` — stand-in sizes for
///   indices not yet measured (defaults: 20 / 64).
/// - `is_row_hidden` / `is_column_hidden` — optional visibility predicates
///   (default: nothing hidden).
/// - `frozen_rows` / `frozen_columns` — leading bands excluded from scroll
///   virtualization, always rendered (default 0).
/// - `overscan_count` — extra rows/columns rendered past the visible window
///   on the leading scroll edge (default 1).
/// - `scale` — zoom factor multiplied into every returned size/offset
///   (default 1.0).
/// - `initial_scroll` — starting `(x, y)` scroll offsets (default origin).
/// - `merged_cells` — merged spans; bounds resolution expands to cover them.
/// - `selection_policy` — single or multiple regions (default single).
pub struct GridConfig {
    pub row_count: u32,
    pub column_count: u32,
    pub row_height: SizeFn,
    pub column_width: SizeFn,
    pub estimated_row_height: f32,
    pub estimated_column_width: f32,
    pub is_row_hidden: Option<HiddenFn>,
    pub is_column_hidden: Option<HiddenFn>,
    pub frozen_rows: u32,
    pub frozen_columns: u32,
    pub overscan_count: u32,
    pub scale: f32,
    pub initial_scroll: (f32, f32),
    pub merged_cells: Vec<AreaBounds>,
    pub selection_policy: SelectionPolicy,
    pub callbacks: GridCallbacks,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_count: 0,
            column_count: 0,
            row_height: Box::new(|_| DEFAULT_ROW_HEIGHT),
            column_width: Box::new(|_| DEFAULT_COL_WIDTH),
            estimated_row_height: DEFAULT_ROW_HEIGHT,
            estimated_column_width: DEFAULT_COL_WIDTH,
            is_row_hidden: None,
            is_column_hidden: None,
            frozen_rows: 0,
            frozen_columns: 0,
            overscan_count: DEFAULT_OVERSCAN,
            scale: 1.0,
            initial_scroll: (0.0, 0.0),
            merged_cells: Vec::new(),
            selection_policy: SelectionPolicy::Single,
            callbacks: GridCallbacks::default(),
        }
    }
}

impl GridConfig {
    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.is_row_hidden.as_ref().is_some_and(|f| f(row))
    }

    pub fn is_column_hidden(&self, col: u32) -> bool {
        self.is_column_hidden.as_ref().is_some_and(|f| f(col))
    }

    /// True when `cell` is inside bounds and not hidden on either axis.
    pub fn is_cell_focusable(&self, cell: CellCoordinate) -> bool {
        cell.row_index < self.row_count
            && cell.column_index < self.column_count
            && !self.is_row_hidden(cell.row_index)
            && !self.is_column_hidden(cell.column_index)
    }
}
