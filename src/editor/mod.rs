//! In-place cell editing.
//!
//! At most one edit session exists at a time. The controller owns session
//! lifecycle and dirty tracking; actual value storage is host-owned, so
//! open/submit/cancel surface events the grid forwards to the configured
//! callbacks.

use crate::selection::keyboard::next_focusable;
use crate::selection::GridContext;
use crate::types::{AreaBounds, CellCoordinate, CellRect, Direction};

/// A live edit session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub cell: CellCoordinate,
    /// True once the live value differs from the value captured at open.
    pub is_dirty: bool,
    /// Value captured when the session opened (seed keystroke or existing
    /// content supplied by the host).
    pub initial_value: String,
    /// Current live value.
    pub value: String,
    /// Pixel box of the edited cell at open time.
    pub rect: CellRect,
    /// Maximum size the edit input may grow to before clipping at the
    /// container edge.
    pub max_width: f32,
    pub max_height: f32,
    pub auto_focus: bool,
    /// Opened from a seed keystroke; such sessions stay dirty for life.
    seeded: bool,
}

/// Notification produced by a session transition.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Opened {
        cell: CellCoordinate,
    },
    Submitted {
        cell: CellCoordinate,
        value: String,
        next_cell: Option<CellCoordinate>,
    },
    Cancelled {
        cell: CellCoordinate,
    },
}

/// Edit session controller: `Closed` (no session) or `Open` (exactly one).
#[derive(Debug, Default)]
pub struct CellEditor {
    session: Option<EditSession>,
}

impl CellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn editing_cell(&self) -> Option<CellCoordinate> {
        self.session.as_ref().map(|s| s.cell)
    }

    /// Open a session for `cell`.
    ///
    /// No-op (returns `None`) when the same cell is already open. Any other
    /// open session is closed without submitting. `initial_value` seeds the
    /// input and marks the session dirty when `has_initial_value` is set
    /// (keystroke activation replaces content; Enter edits it in place).
    pub fn open(
        &mut self,
        cell: CellCoordinate,
        rect: CellRect,
        max_dimensions: (f32, f32),
        initial_value: Option<String>,
        has_initial_value: bool,
        auto_focus: bool,
    ) -> Option<EditorEvent> {
        if self.editing_cell() == Some(cell) {
            return None;
        }
        // Replacing another session discards it silently
        self.session = None;

        let seeded = has_initial_value && initial_value.is_some();
        let value = initial_value.unwrap_or_default();
        self.session = Some(EditSession {
            cell,
            is_dirty: seeded,
            initial_value: value.clone(),
            value,
            rect,
            max_width: max_dimensions.0,
            max_height: max_dimensions.1,
            auto_focus,
            seeded,
        });
        Some(EditorEvent::Opened { cell })
    }

    /// Update the live value, recomputing the dirty flag.
    pub fn set_value(&mut self, value: &str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.value = value.to_string();
        // A seeded session stays dirty even when typed back to the seed
        session.is_dirty = session.seeded || session.value != session.initial_value;
    }

    /// Close the session and report a submit. `next_cell`, when supplied
    /// and focusable, becomes the new active cell (type-ahead across
    /// cells); the grid applies that on receipt of the event.
    pub fn submit(
        &mut self,
        ctx: &dyn GridContext,
        value: String,
        next_cell: Option<CellCoordinate>,
    ) -> Option<EditorEvent> {
        let session = self.session.take()?;
        let next_cell = next_cell.filter(|c| {
            c.row_index < ctx.row_count()
                && c.column_index < ctx.column_count()
                && !ctx.is_row_hidden(c.row_index)
                && !ctx.is_column_hidden(c.column_index)
        });
        Some(EditorEvent::Submitted {
            cell: session.cell,
            value,
            next_cell,
        })
    }

    /// Close without submitting; grid focus returns to the container.
    pub fn cancel(&mut self) -> Option<EditorEvent> {
        let session = self.session.take()?;
        Some(EditorEvent::Cancelled { cell: session.cell })
    }
}

/// Next cell to edit after a submit-and-move.
///
/// Mirrors keyboard navigation, but an open multi-cell region captures
/// movement: the cursor stays inside the last selection region until its
/// edge, then wraps to the next row/column of that region.
pub fn next_edit_cell(
    ctx: &dyn GridContext,
    region: Option<AreaBounds>,
    from: CellCoordinate,
    direction: Direction,
) -> Option<CellCoordinate> {
    let bounded = match region {
        Some(b) if !b.is_single_cell() && b.contains(from) => b,
        _ => return next_focusable(ctx, from, direction, false),
    };

    let width = u64::from(bounded.column_count());
    let height = u64::from(bounded.row_count());
    let count = width * height;
    let (r, c) = (
        u64::from(from.row_index - bounded.top),
        u64::from(from.column_index - bounded.left),
    );

    // Row-major for horizontal movement, column-major for vertical, so the
    // wrap lands on the next row/column of the region
    let mut cursor = match direction {
        Direction::Left | Direction::Right => r * width + c,
        Direction::Up | Direction::Down => c * height + r,
    };

    for _ in 0..count {
        cursor = match direction {
            Direction::Right | Direction::Down => (cursor + 1) % count,
            Direction::Left | Direction::Up => (cursor + count - 1) % count,
        };
        let cell = match direction {
            Direction::Left | Direction::Right => CellCoordinate::new(
                bounded.top + u32::try_from(cursor / width).unwrap_or(0),
                bounded.left + u32::try_from(cursor % width).unwrap_or(0),
            ),
            Direction::Up | Direction::Down => CellCoordinate::new(
                bounded.top + u32::try_from(cursor % height).unwrap_or(0),
                bounded.left + u32::try_from(cursor / height).unwrap_or(0),
            ),
        };
        if !ctx.is_row_hidden(cell.row_index) && !ctx.is_column_hidden(cell.column_index) {
            return Some(cell);
        }
    }
    None
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::selection::tests::TestContext;

    fn cell(r: u32, c: u32) -> CellCoordinate {
        CellCoordinate::new(r, c)
    }

    fn rect() -> CellRect {
        CellRect {
            x: 64.0,
            y: 20.0,
            width: 64.0,
            height: 20.0,
        }
    }

    fn open_at(editor: &mut CellEditor, at: CellCoordinate, seed: Option<&str>) {
        let _ = editor.open(
            at,
            rect(),
            (400.0, 300.0),
            seed.map(str::to_string),
            seed.is_some(),
            true,
        );
    }

    #[test]
    fn test_keystroke_open_is_dirty() {
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), Some("x"));
        let session = editor.session().unwrap();
        assert_eq!(session.value, "x");
        assert!(session.is_dirty);
    }

    #[test]
    fn test_enter_open_is_clean_until_changed() {
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), None);
        assert!(!editor.session().unwrap().is_dirty);

        editor.set_value("hello");
        assert!(editor.session().unwrap().is_dirty);
        editor.set_value("");
        assert!(!editor.session().unwrap().is_dirty);
    }

    #[test]
    fn test_seeded_session_stays_dirty_when_reverted() {
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), Some("x"));
        editor.set_value("xy");
        editor.set_value("x");
        assert!(editor.session().unwrap().is_dirty);
    }

    #[test]
    fn test_reopen_same_cell_is_noop() {
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), Some("x"));
        editor.set_value("xyz");
        let event = editor.open(cell(1, 1), rect(), (400.0, 300.0), None, false, true);
        assert_eq!(event, None);
        // Session untouched
        assert_eq!(editor.session().unwrap().value, "xyz");
    }

    #[test]
    fn test_open_other_cell_discards_previous_session() {
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), Some("x"));
        let event = editor.open(cell(2, 2), rect(), (400.0, 300.0), None, false, true);
        assert_eq!(event, Some(EditorEvent::Opened { cell: cell(2, 2) }));
        assert_eq!(editor.editing_cell(), Some(cell(2, 2)));
        assert!(!editor.session().unwrap().is_dirty);
    }

    #[test]
    fn test_submit_closes_and_reports_next_cell() {
        let ctx = TestContext::new(10, 10);
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), Some("x"));
        let event = editor
            .submit(&ctx, "x".to_string(), Some(cell(2, 1)))
            .unwrap();
        assert_eq!(
            event,
            EditorEvent::Submitted {
                cell: cell(1, 1),
                value: "x".to_string(),
                next_cell: Some(cell(2, 1)),
            }
        );
        assert!(!editor.is_open());
    }

    #[test]
    fn test_submit_drops_hidden_next_cell() {
        let mut ctx = TestContext::new(10, 10);
        ctx.hidden_rows.push(2);
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(1, 1), None);
        let event = editor
            .submit(&ctx, "v".to_string(), Some(cell(2, 1)))
            .unwrap();
        assert_eq!(
            event,
            EditorEvent::Submitted {
                cell: cell(1, 1),
                value: "v".to_string(),
                next_cell: None,
            }
        );
    }

    #[test]
    fn test_cancel_without_submit() {
        let mut editor = CellEditor::new();
        open_at(&mut editor, cell(3, 3), None);
        assert_eq!(
            editor.cancel(),
            Some(EditorEvent::Cancelled { cell: cell(3, 3) })
        );
        assert!(!editor.is_open());
        assert_eq!(editor.cancel(), None);
    }

    #[test]
    fn test_next_edit_cell_plain_grid() {
        let ctx = TestContext::new(10, 10);
        assert_eq!(
            next_edit_cell(&ctx, None, cell(1, 1), Direction::Down),
            Some(cell(2, 1))
        );
        assert_eq!(next_edit_cell(&ctx, None, cell(9, 1), Direction::Down), None);
    }

    #[test]
    fn test_next_edit_cell_wraps_inside_region() {
        let ctx = TestContext::new(10, 10);
        let region = Some(AreaBounds::new(1, 1, 3, 2));
        // Down the first column, then wrap to the top of the next column
        assert_eq!(
            next_edit_cell(&ctx, region, cell(2, 1), Direction::Down),
            Some(cell(3, 1))
        );
        assert_eq!(
            next_edit_cell(&ctx, region, cell(3, 1), Direction::Down),
            Some(cell(1, 2))
        );
        // Bottom-right wraps around to top-left
        assert_eq!(
            next_edit_cell(&ctx, region, cell(3, 2), Direction::Down),
            Some(cell(1, 1))
        );
        // Rightward movement wraps row-major
        assert_eq!(
            next_edit_cell(&ctx, region, cell(1, 2), Direction::Right),
            Some(cell(2, 1))
        );
    }

    #[test]
    fn test_next_edit_cell_outside_region_falls_back() {
        let ctx = TestContext::new(10, 10);
        let region = Some(AreaBounds::new(1, 1, 3, 2));
        assert_eq!(
            next_edit_cell(&ctx, region, cell(7, 7), Direction::Right),
            Some(cell(7, 8))
        );
    }
}
