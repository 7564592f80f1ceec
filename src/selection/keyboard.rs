//! Keyboard navigation for the selection machine.
//!
//! Arrow/Tab/Page/Home/End handling: hidden rows and columns are skipped,
//! `modify` extends the last region instead of replacing the selection, and
//! every move scrolls the target into view.

use crate::types::{AreaBounds, CellCoordinate, Direction, SelectionMode, SelectionPolicy};

use super::{GridContext, SelectionState};

/// Next focusable cell from `from` in `direction`, skipping hidden rows and
/// columns. With `jump_to_edge`, walks to the last contiguous focusable
/// cell in that direction. `None` when no further cell is focusable.
pub fn next_focusable(
    ctx: &dyn GridContext,
    from: CellCoordinate,
    direction: Direction,
    jump_to_edge: bool,
) -> Option<CellCoordinate> {
    let mut current = from;
    let mut found = None;
    loop {
        let Some(stepped) = step(ctx, current, direction) else {
            break;
        };
        current = stepped;
        if is_focusable(ctx, current) {
            found = Some(current);
            if !jump_to_edge {
                break;
            }
        }
    }
    found
}

fn is_focusable(ctx: &dyn GridContext, cell: CellCoordinate) -> bool {
    cell.row_index < ctx.row_count()
        && cell.column_index < ctx.column_count()
        && !ctx.is_row_hidden(cell.row_index)
        && !ctx.is_column_hidden(cell.column_index)
}

/// One raw step in `direction`, `None` at the grid edge. Hidden cells are
/// returned; the caller filters.
fn step(
    ctx: &dyn GridContext,
    from: CellCoordinate,
    direction: Direction,
) -> Option<CellCoordinate> {
    let CellCoordinate {
        row_index: r,
        column_index: c,
    } = from;
    match direction {
        Direction::Up => r.checked_sub(1).map(|r| CellCoordinate::new(r, c)),
        Direction::Down => (r + 1 < ctx.row_count()).then(|| CellCoordinate::new(r + 1, c)),
        Direction::Left => c.checked_sub(1).map(|c| CellCoordinate::new(r, c)),
        Direction::Right => (c + 1 < ctx.column_count()).then(|| CellCoordinate::new(r, c + 1)),
    }
}

impl SelectionState {
    /// Arrow-key navigation.
    ///
    /// Plain moves replace the selection with the next focusable cell;
    /// `modify` drags the last region's floating corner instead, keeping
    /// the anchor. `jump_to_edge` (Ctrl) goes to the last contiguous
    /// focusable cell.
    pub fn key_navigate(
        &mut self,
        ctx: &mut dyn GridContext,
        direction: Direction,
        modify: bool,
        jump_to_edge: bool,
    ) {
        if self.policy() == SelectionPolicy::None {
            return;
        }
        if modify {
            let Some(anchor) = self.anchor() else {
                return;
            };
            let from = self.floating_corner(anchor);
            let Some(next) = next_focusable(ctx, from, direction, jump_to_edge) else {
                return;
            };
            self.modify_selection(ctx, next);
            ctx.scroll_to_cell(next);
            return;
        }

        let Some(active) = self.active_cell() else {
            return;
        };
        let Some(next) = next_focusable(ctx, active, direction, jump_to_edge) else {
            return;
        };
        self.new_selection(ctx, next, next, SelectionMode::Clear);
        ctx.scroll_to_cell(next);
    }

    /// The corner of the last region diagonal from the anchor: the end the
    /// next `modify` move drags.
    fn floating_corner(&self, anchor: CellCoordinate) -> CellCoordinate {
        let Some(bounds) = self.last_bounds() else {
            return anchor;
        };
        let row = if anchor.row_index == bounds.top {
            bounds.bottom
        } else {
            bounds.top
        };
        let col = if anchor.column_index == bounds.left {
            bounds.right
        } else {
            bounds.left
        };
        CellCoordinate::new(row, col)
    }

    /// Tab cycles the active cell through the last region's cells in
    /// row-major order (reverse with shift), wrapping only within that
    /// region. Outside a multi-cell region it behaves as a plain
    /// right/left move.
    pub fn tab_navigate(&mut self, ctx: &mut dyn GridContext, reverse: bool) {
        let direction = if reverse {
            Direction::Left
        } else {
            Direction::Right
        };
        let (Some(active), Some(bounds)) = (self.active_cell(), self.last_bounds()) else {
            self.key_navigate(ctx, direction, false, false);
            return;
        };
        if bounds.is_single_cell() || !bounds.contains(active) {
            self.key_navigate(ctx, direction, false, false);
            return;
        }

        let width = u64::from(bounds.column_count());
        let count = width * u64::from(bounds.row_count());
        let index = u64::from(active.row_index - bounds.top) * width
            + u64::from(active.column_index - bounds.left);

        // Advance through the region, skipping hidden cells, at most one
        // full cycle
        let mut cursor = index;
        for _ in 0..count {
            cursor = if reverse {
                (cursor + count - 1) % count
            } else {
                (cursor + 1) % count
            };
            let cell = CellCoordinate::new(
                bounds.top + u32::try_from(cursor / width).unwrap_or(0),
                bounds.left + u32::try_from(cursor % width).unwrap_or(0),
            );
            if is_focusable(ctx, cell) {
                self.set_active_cell(ctx, cell);
                ctx.scroll_to_cell(cell);
                return;
            }
        }
    }

    /// Page movement: one viewport's worth of rows/columns, derived from
    /// the currently visible start/stop indices.
    pub fn page_navigate(&mut self, ctx: &mut dyn GridContext, direction: Direction, modify: bool) {
        let (start, stop) = match direction {
            Direction::Up | Direction::Down => ctx.visible_rows(),
            Direction::Left | Direction::Right => ctx.visible_columns(),
        };
        let span = stop.saturating_sub(start).max(1);

        let from = if modify {
            let Some(anchor) = self.anchor() else {
                return;
            };
            self.floating_corner(anchor)
        } else {
            let Some(active) = self.active_cell() else {
                return;
            };
            active
        };

        let mut cursor = from;
        for _ in 0..span {
            let Some(next) = next_focusable(ctx, cursor, direction, false) else {
                break;
            };
            cursor = next;
        }
        if cursor == from {
            return;
        }
        if modify {
            self.modify_selection(ctx, cursor);
        } else {
            self.new_selection(ctx, cursor, cursor, SelectionMode::Clear);
        }
        ctx.scroll_to_cell(cursor);
    }

    /// Home/End without Ctrl: first/last focusable cell within the current
    /// row. With Ctrl: the grid corner nearest (0,0) / (rows-1, cols-1).
    pub fn edge_navigate(&mut self, ctx: &mut dyn GridContext, end: bool, ctrl: bool, modify: bool) {
        let Some(active) = self.active_cell() else {
            return;
        };

        let target = if ctrl {
            let corner = if end {
                CellCoordinate::new(
                    ctx.row_count().saturating_sub(1),
                    ctx.column_count().saturating_sub(1),
                )
            } else {
                CellCoordinate::new(0, 0)
            };
            nearest_focusable_inward(ctx, corner, end)
        } else {
            let direction = if end { Direction::Right } else { Direction::Left };
            next_focusable(ctx, active, direction, true)
        };
        let Some(target) = target else {
            return;
        };
        if modify {
            self.modify_selection(ctx, target);
        } else {
            self.new_selection(ctx, target, target, SelectionMode::Clear);
        }
        ctx.scroll_to_cell(target);
    }

    /// Shift+Space: select the active cell's full row, or the last
    /// region's row span when it is a plain cell range. A region already
    /// spanning every row (column selection, select-all) contributes no
    /// span.
    pub fn select_active_row(&mut self, ctx: &mut dyn GridContext) {
        let Some(active) = self.active_cell() else {
            return;
        };
        let all_rows = ctx.row_count().saturating_sub(1);
        let (top, bottom) = match self.last_bounds() {
            Some(b) if b.contains(active) && !(b.top == 0 && b.bottom == all_rows) => {
                (b.top, b.bottom)
            }
            _ => (active.row_index, active.row_index),
        };
        self.select_row_span(ctx, top, bottom);
        self.set_active_cell(ctx, active);
    }

    /// Ctrl+Space: column counterpart of [`SelectionState::select_active_row`].
    pub fn select_active_column(&mut self, ctx: &mut dyn GridContext) {
        let Some(active) = self.active_cell() else {
            return;
        };
        let all_cols = ctx.column_count().saturating_sub(1);
        let (left, right) = match self.last_bounds() {
            Some(b) if b.contains(active) && !(b.left == 0 && b.right == all_cols) => {
                (b.left, b.right)
            }
            _ => (active.column_index, active.column_index),
        };
        self.select_column_span(ctx, left, right);
        self.set_active_cell(ctx, active);
    }
}

/// Walk inward from a grid corner until a focusable cell is found.
fn nearest_focusable_inward(
    ctx: &dyn GridContext,
    corner: CellCoordinate,
    from_end: bool,
) -> Option<CellCoordinate> {
    if is_focusable(ctx, corner) {
        return Some(corner);
    }
    let row_dir = if from_end { Direction::Up } else { Direction::Down };
    let col_dir = if from_end { Direction::Left } else { Direction::Right };

    // Fix up each axis independently: first visible row, first visible col
    let mut cell = corner;
    if ctx.is_row_hidden(cell.row_index) {
        cell = next_focusable_row(ctx, cell, row_dir)?;
    }
    if ctx.is_column_hidden(cell.column_index) {
        cell = next_focusable(ctx, cell, col_dir, false)?;
    }
    is_focusable(ctx, cell).then_some(cell)
}

fn next_focusable_row(
    ctx: &dyn GridContext,
    from: CellCoordinate,
    direction: Direction,
) -> Option<CellCoordinate> {
    let mut cell = from;
    loop {
        cell = step(ctx, cell, direction)?;
        if !ctx.is_row_hidden(cell.row_index) {
            return Some(cell);
        }
    }
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
    use super::super::tests::TestContext;
    use super::*;
    use crate::types::SelectionPolicy;

    fn cell(r: u32, c: u32) -> CellCoordinate {
        CellCoordinate::new(r, c)
    }

    fn with_active(ctx: &TestContext, at: CellCoordinate) -> SelectionState {
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(ctx, at, at, SelectionMode::Clear);
        sel
    }

    #[test]
    fn test_next_focusable_skips_hidden() {
        let mut ctx = TestContext::new(10, 10);
        ctx.hidden_rows.push(3);
        ctx.hidden_rows.push(4);
        let next = next_focusable(&ctx, cell(2, 0), Direction::Down, false);
        assert_eq!(next, Some(cell(5, 0)));
    }

    #[test]
    fn test_next_focusable_none_at_edge() {
        let ctx = TestContext::new(10, 10);
        assert_eq!(next_focusable(&ctx, cell(0, 0), Direction::Up, false), None);
        assert_eq!(next_focusable(&ctx, cell(9, 9), Direction::Down, false), None);
    }

    #[test]
    fn test_jump_to_edge_stops_before_hidden_gap() {
        let mut ctx = TestContext::new(10, 10);
        ctx.hidden_rows.push(9);
        let next = next_focusable(&ctx, cell(2, 0), Direction::Down, true);
        assert_eq!(next, Some(cell(8, 0)));
    }

    #[test]
    fn test_key_navigate_replaces_selection_and_scrolls() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(5, 5));
        sel.key_navigate(&mut ctx, Direction::Down, false, false);
        assert_eq!(sel.active_cell(), Some(cell(6, 5)));
        assert_eq!(sel.regions().len(), 1);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::single(cell(6, 5)));
        assert_eq!(ctx.scrolled_to, vec![cell(6, 5)]);
    }

    #[test]
    fn test_key_navigate_modify_extends_region() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(5, 5));
        sel.key_navigate(&mut ctx, Direction::Down, true, false);
        sel.key_navigate(&mut ctx, Direction::Right, true, false);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(5, 5, 6, 6));
        // Anchor unchanged; active cell stays put under modify
        assert_eq!(sel.anchor(), Some(cell(5, 5)));
    }

    #[test]
    fn test_key_navigate_modify_shrinks_back_past_anchor() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(5, 5));
        sel.key_navigate(&mut ctx, Direction::Down, true, false);
        sel.key_navigate(&mut ctx, Direction::Up, true, false);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::single(cell(5, 5)));
    }

    #[test]
    fn test_key_navigate_at_boundary_is_noop() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(0, 0));
        sel.key_navigate(&mut ctx, Direction::Up, false, false);
        assert_eq!(sel.active_cell(), Some(cell(0, 0)));
        assert!(ctx.scrolled_to.is_empty());
    }

    #[test]
    fn test_tab_cycles_region_row_major_and_wraps() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(1, 1), cell(2, 2), SelectionMode::Clear);
        // Active starts at region top-left (1,1)
        let expected = [cell(1, 2), cell(2, 1), cell(2, 2), cell(1, 1)];
        for want in expected {
            sel.tab_navigate(&mut ctx, false);
            assert_eq!(sel.active_cell(), Some(want));
        }
    }

    #[test]
    fn test_tab_reverse_wraps_backward() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(1, 1), cell(2, 2), SelectionMode::Clear);
        sel.tab_navigate(&mut ctx, true);
        assert_eq!(sel.active_cell(), Some(cell(2, 2)));
    }

    #[test]
    fn test_tab_outside_region_moves_right() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(4, 4));
        sel.tab_navigate(&mut ctx, false);
        assert_eq!(sel.active_cell(), Some(cell(4, 5)));
    }

    #[test]
    fn test_page_navigate_moves_by_viewport_span() {
        let mut ctx = TestContext::new(100, 10);
        ctx.visible_rows = (0, 19);
        let mut sel = with_active(&ctx, cell(5, 0));
        sel.page_navigate(&mut ctx, Direction::Down, false);
        assert_eq!(sel.active_cell(), Some(cell(24, 0)));
        sel.page_navigate(&mut ctx, Direction::Up, false);
        assert_eq!(sel.active_cell(), Some(cell(5, 0)));
    }

    #[test]
    fn test_page_navigate_clamps_at_end() {
        let mut ctx = TestContext::new(25, 10);
        ctx.visible_rows = (0, 19);
        let mut sel = with_active(&ctx, cell(20, 0));
        sel.page_navigate(&mut ctx, Direction::Down, false);
        assert_eq!(sel.active_cell(), Some(cell(24, 0)));
    }

    #[test]
    fn test_home_end_within_row() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(4, 5));
        sel.edge_navigate(&mut ctx, false, false, false);
        assert_eq!(sel.active_cell(), Some(cell(4, 0)));
        sel.edge_navigate(&mut ctx, true, false, false);
        assert_eq!(sel.active_cell(), Some(cell(4, 9)));
    }

    #[test]
    fn test_ctrl_home_end_grid_corners() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(4, 5));
        sel.edge_navigate(&mut ctx, true, true, false);
        assert_eq!(sel.active_cell(), Some(cell(9, 9)));
        sel.edge_navigate(&mut ctx, false, true, false);
        assert_eq!(sel.active_cell(), Some(cell(0, 0)));
    }

    #[test]
    fn test_space_selection_anchored_at_active() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = with_active(&ctx, cell(4, 5));
        sel.select_active_row(&mut ctx);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(4, 0, 4, 9));
        assert_eq!(sel.active_cell(), Some(cell(4, 5)));

        sel.select_active_column(&mut ctx);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(0, 5, 9, 5));
        assert_eq!(sel.active_cell(), Some(cell(4, 5)));
    }

    #[test]
    fn test_space_selection_inherits_plain_range_span() {
        let mut ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(2, 3), cell(5, 6), SelectionMode::Clear);
        sel.select_active_row(&mut ctx);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(2, 0, 5, 9));
    }
}
