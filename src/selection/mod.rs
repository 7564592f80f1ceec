//! Multi-region selection state machine.
//!
//! Pointer and keyboard gestures mutate an ordered region list plus an
//! active cell. The machine sees the grid only through [`GridContext`];
//! every operation targeting an out-of-bounds or hidden cell is a silent
//! no-op, because pointer coordinates during fast drags routinely resolve
//! to invalid cells at the edges.

pub mod keyboard;

use crate::types::{
    AreaBounds, CellCoordinate, SelectionMode, SelectionPolicy, SelectionRegion,
};

/// Narrow interface the machine consumes from the grid.
pub trait GridContext {
    fn row_count(&self) -> u32;
    fn column_count(&self) -> u32;
    fn is_row_hidden(&self, row: u32) -> bool;
    fn is_column_hidden(&self, col: u32) -> bool;
    /// Merge-aware expansion: grow bounds until they cover every merged
    /// span they touch.
    fn expand_bounds(&self, bounds: AreaBounds) -> AreaBounds;
    /// Currently visible scrollable row window (inclusive).
    fn visible_rows(&self) -> (u32, u32);
    /// Currently visible scrollable column window (inclusive).
    fn visible_columns(&self) -> (u32, u32);
    /// Bring a cell into view.
    fn scroll_to_cell(&mut self, cell: CellCoordinate);
}

/// Notification produced by a completed gesture. The grid forwards these to
/// the host callbacks registered in `GridConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A pointer selection finished; carries the anchor pair.
    SelectionEnd {
        anchor: CellCoordinate,
        focus: CellCoordinate,
    },
    /// A drag-move committed.
    SegmentMoved { from: AreaBounds, to: AreaBounds },
    /// A fill-handle drag committed. Dispatched before the fill target
    /// replaces the last region.
    FillCommitted {
        target: AreaBounds,
        source: AreaBounds,
    },
}

/// Exactly one pointer gesture may be live at a time; entering one cancels
/// any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragGesture {
    /// Extending the last region toward the pointer.
    Selecting,
    /// Translating a snapshot of a region (never resizing).
    Dragging {
        source: AreaBounds,
        grab: CellCoordinate,
        preview: AreaBounds,
        region_index: usize,
    },
    /// Growing a fill preview along one dominant axis.
    Filling {
        source: AreaBounds,
        preview: Option<AreaBounds>,
    },
}

/// Selection state: ordered regions, active cell, anchor, live gesture.
pub struct SelectionState {
    regions: Vec<SelectionRegion>,
    active_cell: Option<CellCoordinate>,
    anchor: Option<CellCoordinate>,
    drag: Option<DragGesture>,
    policy: SelectionPolicy,
}

impl SelectionState {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            regions: Vec::new(),
            active_cell: None,
            anchor: None,
            drag: None,
            policy,
        }
    }

    pub fn regions(&self) -> &[SelectionRegion] {
        &self.regions
    }

    pub fn active_cell(&self) -> Option<CellCoordinate> {
        self.active_cell
    }

    pub fn anchor(&self) -> Option<CellCoordinate> {
        self.anchor
    }

    pub fn drag(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Bounds of the last region, if any.
    pub fn last_bounds(&self) -> Option<AreaBounds> {
        self.regions.last().map(|r| r.bounds)
    }

    /// Clear all regions and the active cell.
    pub fn reset(&mut self) {
        self.regions.clear();
        self.active_cell = None;
        self.anchor = None;
        self.drag = None;
    }

    fn grid_bounds(ctx: &dyn GridContext) -> Option<AreaBounds> {
        let rows = ctx.row_count();
        let cols = ctx.column_count();
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(AreaBounds {
            top: 0,
            left: 0,
            bottom: rows - 1,
            right: cols - 1,
        })
    }

    fn is_focusable(ctx: &dyn GridContext, cell: CellCoordinate) -> bool {
        cell.row_index < ctx.row_count()
            && cell.column_index < ctx.column_count()
            && !ctx.is_row_hidden(cell.row_index)
            && !ctx.is_column_hidden(cell.column_index)
    }

    // ------------------------------------------------------------------
    // Core list operations
    // ------------------------------------------------------------------

    /// Start a selection at `start` (optionally already spanning to `end`).
    ///
    /// `Clear` replaces the whole list, `Modify` extends the last region,
    /// `Append` adds a region under policy `Multiple`. The active cell
    /// becomes the region's top-left.
    pub fn new_selection(
        &mut self,
        ctx: &dyn GridContext,
        start: CellCoordinate,
        end: CellCoordinate,
        mode: SelectionMode,
    ) {
        if self.policy == SelectionPolicy::None || !Self::is_focusable(ctx, start) {
            return;
        }
        let bounds = ctx.expand_bounds(AreaBounds::between(start, end));
        self.active_cell = Some(bounds.top_left());
        self.anchor = Some(start);

        match mode {
            SelectionMode::Clear => {
                self.regions.clear();
                self.regions.push(SelectionRegion::new(bounds));
            }
            SelectionMode::Modify => {
                if let Some(last) = self.regions.last_mut() {
                    last.bounds = bounds;
                } else {
                    self.regions.push(SelectionRegion::new(bounds));
                }
            }
            SelectionMode::Append => {
                if self.policy != SelectionPolicy::Multiple {
                    return;
                }
                self.regions.push(SelectionRegion::new(bounds));
            }
        }
    }

    /// Recompute the last region between the anchor and `coord`.
    ///
    /// Requires an anchor; tags the region `in_progress` while a pointer
    /// gesture is live.
    pub fn modify_selection(&mut self, ctx: &dyn GridContext, coord: CellCoordinate) {
        if self.policy == SelectionPolicy::None || !Self::is_focusable(ctx, coord) {
            return;
        }
        let Some(anchor) = self.anchor else {
            return;
        };
        let bounds = ctx.expand_bounds(AreaBounds::between(anchor, coord));
        let in_progress = matches!(self.drag, Some(DragGesture::Selecting));
        if let Some(last) = self.regions.last_mut() {
            last.bounds = bounds;
            last.in_progress = in_progress;
        } else {
            let mut region = SelectionRegion::new(bounds);
            region.in_progress = in_progress;
            self.regions.push(region);
        }
    }

    /// Add a region spanning `start..=end` (policy `Multiple` only).
    pub fn append_selection(
        &mut self,
        ctx: &dyn GridContext,
        start: CellCoordinate,
        end: CellCoordinate,
    ) {
        if self.policy != SelectionPolicy::Multiple || !Self::is_focusable(ctx, start) {
            return;
        }
        let bounds = ctx.expand_bounds(AreaBounds::between(start, end));
        self.regions.push(SelectionRegion::new(bounds));
        self.active_cell = Some(start);
        self.anchor = Some(start);
    }

    /// One region spanning the full grid rectangle.
    pub fn select_all(&mut self, ctx: &dyn GridContext) {
        if self.policy == SelectionPolicy::None {
            return;
        }
        let Some(bounds) = Self::grid_bounds(ctx) else {
            return;
        };
        self.regions.clear();
        self.regions.push(SelectionRegion::new(bounds));
        self.anchor = Some(bounds.top_left());
        if self.active_cell.is_none() {
            self.active_cell = Some(bounds.top_left());
        }
    }

    /// Select entire rows `start_row..=end_row`.
    pub fn select_row_span(&mut self, ctx: &dyn GridContext, start_row: u32, end_row: u32) {
        if self.policy == SelectionPolicy::None {
            return;
        }
        let Some(grid) = Self::grid_bounds(ctx) else {
            return;
        };
        if start_row > grid.bottom || end_row > grid.bottom {
            return;
        }
        let bounds = AreaBounds::new(start_row, 0, end_row, grid.right);
        self.replace_last_or_push(bounds);
        self.anchor = Some(bounds.top_left());
        self.active_cell = Some(CellCoordinate::new(bounds.top, 0));
    }

    /// Select entire columns `start_col..=end_col`.
    pub fn select_column_span(&mut self, ctx: &dyn GridContext, start_col: u32, end_col: u32) {
        if self.policy == SelectionPolicy::None {
            return;
        }
        let Some(grid) = Self::grid_bounds(ctx) else {
            return;
        };
        if start_col > grid.right || end_col > grid.right {
            return;
        }
        let bounds = AreaBounds::new(0, start_col, grid.bottom, end_col);
        self.replace_last_or_push(bounds);
        self.anchor = Some(bounds.top_left());
        self.active_cell = Some(CellCoordinate::new(0, bounds.left));
    }

    fn replace_last_or_push(&mut self, bounds: AreaBounds) {
        if let Some(last) = self.regions.last_mut() {
            last.bounds = bounds;
            last.in_progress = false;
        } else {
            self.regions.push(SelectionRegion::new(bounds));
        }
    }

    // ------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------

    /// Pointer-down on a cell.
    ///
    /// Shift extends from the anchor; meta toggles membership (removing an
    /// exactly-matching single-cell region, else appending); a plain click
    /// on the active cell is a no-op; a plain click elsewhere starts a
    /// fresh selection.
    pub fn pointer_down(
        &mut self,
        ctx: &dyn GridContext,
        coord: CellCoordinate,
        shift: bool,
        meta: bool,
    ) {
        if self.policy == SelectionPolicy::None || !Self::is_focusable(ctx, coord) {
            return;
        }
        self.drag = Some(DragGesture::Selecting);

        if shift {
            self.modify_selection(ctx, coord);
            return;
        }

        if meta && self.active_cell.is_some() {
            // Toggle membership: remove an exactly-matching single-cell
            // region and re-anchor, else append a new one.
            if let Some(idx) = self
                .regions
                .iter()
                .position(|r| r.bounds.is_single_cell() && r.bounds.contains(coord))
            {
                self.regions.remove(idx);
                self.active_cell = Some(coord);
                self.anchor = Some(coord);
                self.drag = None;
                return;
            }
            self.append_selection(ctx, coord, coord);
            return;
        }

        if self.active_cell == Some(coord) {
            // Plain click on the active cell leaves the selection alone
            self.anchor = Some(coord);
            return;
        }

        self.new_selection(ctx, coord, coord, SelectionMode::Clear);
        if let Some(last) = self.regions.last_mut() {
            last.in_progress = true;
        }
    }

    /// Pointer-move while a gesture is live.
    pub fn pointer_move(&mut self, ctx: &dyn GridContext, coord: CellCoordinate) {
        match self.drag.clone() {
            Some(DragGesture::Selecting) => self.modify_selection(ctx, coord),
            Some(DragGesture::Dragging {
                source,
                grab,
                region_index,
                ..
            }) => {
                if !Self::is_focusable(ctx, coord) {
                    return;
                }
                let Some(limit) = Self::grid_bounds(ctx) else {
                    return;
                };
                let delta_rows = i64::from(coord.row_index) - i64::from(grab.row_index);
                let delta_cols = i64::from(coord.column_index) - i64::from(grab.column_index);
                let preview = source.translated_within(delta_rows, delta_cols, &limit);
                self.drag = Some(DragGesture::Dragging {
                    source,
                    grab,
                    preview,
                    region_index,
                });
            }
            Some(DragGesture::Filling { source, .. }) => {
                if coord.row_index >= ctx.row_count() || coord.column_index >= ctx.column_count() {
                    return;
                }
                let preview = fill_preview(&source, coord);
                self.drag = Some(DragGesture::Filling { source, preview });
            }
            None => {}
        }
    }

    /// Pointer release: commit the live gesture, returning the event the
    /// grid should forward to the host.
    pub fn pointer_up(&mut self) -> Option<SelectionEvent> {
        match self.drag.take()? {
            DragGesture::Selecting => {
                let last = self.regions.last_mut()?;
                last.in_progress = false;
                let bounds = last.bounds;
                let anchor = self.anchor?;
                // Focus is the corner diagonal from the anchor
                let focus_row = if anchor.row_index == bounds.top {
                    bounds.bottom
                } else {
                    bounds.top
                };
                let focus_col = if anchor.column_index == bounds.left {
                    bounds.right
                } else {
                    bounds.left
                };
                Some(SelectionEvent::SelectionEnd {
                    anchor,
                    focus: CellCoordinate::new(focus_row, focus_col),
                })
            }
            DragGesture::Dragging {
                source,
                preview,
                region_index,
                ..
            } => {
                if preview == source {
                    return None;
                }
                if let Some(region) = self.regions.get_mut(region_index) {
                    region.bounds = preview;
                    region.in_progress = false;
                }
                // Re-anchor the active cell at the same offset inside the
                // moved region
                if let Some(active) = self.active_cell {
                    if source.contains(active) {
                        let dr = active.row_index - source.top;
                        let dc = active.column_index - source.left;
                        self.active_cell =
                            Some(CellCoordinate::new(preview.top + dr, preview.left + dc));
                    }
                }
                self.anchor = Some(preview.top_left());
                Some(SelectionEvent::SegmentMoved {
                    from: source,
                    to: preview,
                })
            }
            DragGesture::Filling { source, preview } => {
                // The region list is untouched until the grid has
                // dispatched the event and calls `commit_fill`
                let target = preview?;
                Some(SelectionEvent::FillCommitted { target, source })
            }
        }
    }

    /// Replace the last region with a committed fill target. Called by the
    /// grid after the `FillCommitted` event has been dispatched.
    pub fn commit_fill(&mut self, target: AreaBounds) {
        self.replace_last_or_push(target);
    }

    /// Pointer-down on a region body to start a drag-move. Snapshots the
    /// last region containing `coord`.
    pub fn begin_drag(&mut self, ctx: &dyn GridContext, coord: CellCoordinate) {
        if !Self::is_focusable(ctx, coord) {
            return;
        }
        let Some(region_index) = self
            .regions
            .iter()
            .rposition(|r| r.bounds.contains(coord))
        else {
            return;
        };
        let source = match self.regions.get(region_index) {
            Some(r) => r.bounds,
            None => return,
        };
        self.drag = Some(DragGesture::Dragging {
            source,
            grab: coord,
            preview: source,
            region_index,
        });
    }

    /// Pointer-down on the fill handle. The anchor is the last region, or
    /// the active cell when nothing is selected.
    pub fn begin_fill(&mut self, ctx: &dyn GridContext) {
        let source = match self.last_bounds() {
            Some(bounds) => bounds,
            None => match self.active_cell {
                Some(cell) if Self::is_focusable(ctx, cell) => AreaBounds::single(cell),
                _ => return,
            },
        };
        self.drag = Some(DragGesture::Filling {
            source,
            preview: None,
        });
    }

    /// Set the active cell directly (editor hand-off).
    pub fn set_active_cell(&mut self, ctx: &dyn GridContext, cell: CellCoordinate) {
        if !Self::is_focusable(ctx, cell) {
            return;
        }
        self.active_cell = Some(cell);
        self.anchor = Some(cell);
    }
}

/// Candidate fill region for a pointer at `coord`, grown from `source`
/// along the dominant axis only. `None` when the pointer is inside the
/// source (the candidate would be a subset, which cancels the preview).
fn fill_preview(source: &AreaBounds, coord: CellCoordinate) -> Option<AreaBounds> {
    let grow_down = coord.row_index.saturating_sub(source.bottom);
    let grow_up = source.top.saturating_sub(coord.row_index);
    let grow_right = coord.column_index.saturating_sub(source.right);
    let grow_left = source.left.saturating_sub(coord.column_index);

    let vertical = grow_down.max(grow_up);
    let horizontal = grow_right.max(grow_left);
    if vertical == 0 && horizontal == 0 {
        return None;
    }

    // One axis at a time: the larger excursion wins, remaining edges stay
    // clamped to the source bounds
    let mut target = *source;
    if vertical >= horizontal {
        if grow_down >= grow_up {
            target.bottom = coord.row_index;
        } else {
            target.top = coord.row_index;
        }
    } else if grow_right >= grow_left {
        target.right = coord.column_index;
    } else {
        target.left = coord.column_index;
    }
    Some(target)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
pub(crate) mod tests {
    use super::*;

    /// Plain-matrix context for machine tests: no merges, optional hidden
    /// rows/columns.
    pub(crate) struct TestContext {
        pub rows: u32,
        pub cols: u32,
        pub hidden_rows: Vec<u32>,
        pub hidden_cols: Vec<u32>,
        pub merges: Vec<AreaBounds>,
        pub visible_rows: (u32, u32),
        pub visible_cols: (u32, u32),
        pub scrolled_to: Vec<CellCoordinate>,
    }

    impl TestContext {
        pub fn new(rows: u32, cols: u32) -> Self {
            Self {
                rows,
                cols,
                hidden_rows: Vec::new(),
                hidden_cols: Vec::new(),
                merges: Vec::new(),
                visible_rows: (0, 19),
                visible_cols: (0, 9),
                scrolled_to: Vec::new(),
            }
        }
    }

    impl GridContext for TestContext {
        fn row_count(&self) -> u32 {
            self.rows
        }
        fn column_count(&self) -> u32 {
            self.cols
        }
        fn is_row_hidden(&self, row: u32) -> bool {
            self.hidden_rows.contains(&row)
        }
        fn is_column_hidden(&self, col: u32) -> bool {
            self.hidden_cols.contains(&col)
        }
        fn expand_bounds(&self, bounds: AreaBounds) -> AreaBounds {
            let mut out = bounds;
            loop {
                let before = out;
                for merge in &self.merges {
                    if out.intersects(merge) {
                        out = out.union(merge);
                    }
                }
                if out == before {
                    return out;
                }
            }
        }
        fn visible_rows(&self) -> (u32, u32) {
            self.visible_rows
        }
        fn visible_columns(&self) -> (u32, u32) {
            self.visible_cols
        }
        fn scroll_to_cell(&mut self, cell: CellCoordinate) {
            self.scrolled_to.push(cell);
        }
    }

    fn cell(r: u32, c: u32) -> CellCoordinate {
        CellCoordinate::new(r, c)
    }

    #[test]
    fn test_new_selection_sets_active_and_region() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(3, 4), cell(3, 4), SelectionMode::Clear);
        assert_eq!(sel.regions().len(), 1);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(3, 4, 3, 4));
        assert_eq!(sel.active_cell(), Some(cell(3, 4)));
    }

    #[test]
    fn test_new_selection_idempotent() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(3, 4), cell(3, 4), SelectionMode::Clear);
        let first = sel.regions().to_vec();
        sel.new_selection(&ctx, cell(3, 4), cell(3, 4), SelectionMode::Clear);
        assert_eq!(sel.regions(), &first[..]);
        assert_eq!(sel.regions().len(), 1);
    }

    #[test]
    fn test_new_selection_rejects_out_of_bounds_and_hidden() {
        let mut ctx = TestContext::new(10, 10);
        ctx.hidden_rows.push(5);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(20, 0), cell(20, 0), SelectionMode::Clear);
        assert!(sel.regions().is_empty());
        sel.new_selection(&ctx, cell(5, 0), cell(5, 0), SelectionMode::Clear);
        assert!(sel.regions().is_empty());
        assert_eq!(sel.active_cell(), None);
    }

    #[test]
    fn test_modify_requires_anchor() {
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.modify_selection(&ctx, cell(4, 4));
        assert!(sel.regions().is_empty());
    }

    #[test]
    fn test_modify_replaces_only_last_region() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(0, 0), cell(1, 1), SelectionMode::Clear);
        sel.append_selection(&ctx, cell(5, 5), cell(5, 5));
        sel.modify_selection(&ctx, cell(8, 7));
        assert_eq!(sel.regions().len(), 2);
        assert_eq!(sel.regions()[0].bounds, AreaBounds::new(0, 0, 1, 1));
        assert_eq!(sel.regions()[1].bounds, AreaBounds::new(5, 5, 8, 7));
    }

    #[test]
    fn test_selection_normalized_regardless_of_drag_direction() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(9, 9), cell(9, 9), SelectionMode::Clear);
        sel.modify_selection(&ctx, cell(2, 3));
        let b = sel.last_bounds().unwrap();
        assert!(b.top <= b.bottom && b.left <= b.right);
        assert_eq!(b, AreaBounds::new(2, 3, 9, 9));
    }

    #[test]
    fn test_merge_aware_expansion() {
        let mut ctx = TestContext::new(100, 50);
        ctx.merges.push(AreaBounds::new(2, 2, 4, 4));
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(1, 1), cell(1, 1), SelectionMode::Clear);
        sel.modify_selection(&ctx, cell(2, 2));
        // Touching the merge pulls in the whole span
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(1, 1, 4, 4));
    }

    #[test]
    fn test_append_ignored_under_single_policy() {
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Single);
        sel.new_selection(&ctx, cell(0, 0), cell(0, 0), SelectionMode::Clear);
        sel.append_selection(&ctx, cell(2, 2), cell(2, 2));
        assert_eq!(sel.regions().len(), 1);
    }

    #[test]
    fn test_scenario_meta_click_appends_single_cell_region() {
        // Policy multiple, active cell (2,2), no selection; ctrl-click (2,2)
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.set_active_cell(&ctx, cell(2, 2));
        sel.pointer_down(&ctx, cell(2, 2), false, true);
        assert_eq!(sel.regions().len(), 1);
        assert_eq!(
            sel.last_bounds().unwrap(),
            AreaBounds {
                top: 2,
                left: 2,
                bottom: 2,
                right: 2
            }
        );
    }

    #[test]
    fn test_meta_click_removes_matching_single_cell_region() {
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.set_active_cell(&ctx, cell(2, 2));
        sel.pointer_down(&ctx, cell(2, 2), false, true);
        assert_eq!(sel.regions().len(), 1);
        // Second meta-click toggles it off and re-anchors
        sel.pointer_down(&ctx, cell(2, 2), false, true);
        assert!(sel.regions().is_empty());
        assert_eq!(sel.active_cell(), Some(cell(2, 2)));
        assert_eq!(sel.anchor(), Some(cell(2, 2)));
    }

    #[test]
    fn test_plain_click_on_active_cell_is_noop() {
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(3, 3), cell(5, 5), SelectionMode::Clear);
        let before = sel.regions().to_vec();
        // Active cell is the region's top-left (3,3)
        sel.pointer_down(&ctx, cell(3, 3), false, false);
        assert_eq!(sel.regions(), &before[..]);
    }

    #[test]
    fn test_shift_click_extends_last_region() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.pointer_down(&ctx, cell(2, 2), false, false);
        let _ = sel.pointer_up();
        sel.pointer_down(&ctx, cell(6, 4), true, false);
        assert_eq!(sel.regions().len(), 1);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(2, 2, 6, 4));
    }

    #[test]
    fn test_drag_select_marks_in_progress_until_release() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.pointer_down(&ctx, cell(1, 1), false, false);
        sel.pointer_move(&ctx, cell(4, 2));
        assert!(sel.regions().last().unwrap().in_progress);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(1, 1, 4, 2));

        let event = sel.pointer_up().unwrap();
        assert!(!sel.regions().last().unwrap().in_progress);
        assert_eq!(
            event,
            SelectionEvent::SelectionEnd {
                anchor: cell(1, 1),
                focus: cell(4, 2)
            }
        );
    }

    #[test]
    fn test_pointer_move_to_invalid_cell_is_noop() {
        let mut ctx = TestContext::new(10, 10);
        ctx.hidden_cols.push(9);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.pointer_down(&ctx, cell(1, 1), false, false);
        sel.pointer_move(&ctx, cell(1, 9));
        // Hidden column rejected, bounds unchanged
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(1, 1, 1, 1));
    }

    #[test]
    fn test_drag_move_translates_without_resizing() {
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(2, 2), cell(4, 4), SelectionMode::Clear);
        sel.begin_drag(&ctx, cell(3, 3));
        sel.pointer_move(&ctx, cell(8, 8));
        let Some(DragGesture::Dragging { preview, .. }) = sel.drag().cloned() else {
            panic!("expected dragging gesture");
        };
        // Clamped at the grid edge, size preserved
        assert_eq!(preview, AreaBounds::new(7, 7, 9, 9));

        let event = sel.pointer_up().unwrap();
        assert_eq!(
            event,
            SelectionEvent::SegmentMoved {
                from: AreaBounds::new(2, 2, 4, 4),
                to: AreaBounds::new(7, 7, 9, 9)
            }
        );
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(7, 7, 9, 9));
        // Active cell re-anchored at the same offset inside the region
        assert_eq!(sel.active_cell(), Some(cell(7, 7)));
    }

    #[test]
    fn test_scenario_fill_down_dominant_axis() {
        // Fill drag from anchor {0,0,0,0} to pointer (3,0)
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(0, 0), cell(0, 0), SelectionMode::Clear);
        let _ = sel.pointer_up();
        sel.begin_fill(&ctx);
        sel.pointer_move(&ctx, cell(3, 0));
        let Some(DragGesture::Filling { preview, .. }) = sel.drag() else {
            panic!("expected filling gesture");
        };
        assert_eq!(
            *preview,
            Some(AreaBounds {
                top: 0,
                left: 0,
                bottom: 3,
                right: 0
            })
        );
    }

    #[test]
    fn test_fill_clamps_secondary_axis() {
        let ctx = TestContext::new(20, 20);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(2, 2), cell(3, 3), SelectionMode::Clear);
        let _ = sel.pointer_up();
        sel.begin_fill(&ctx);
        // Pointer below and slightly right: vertical excursion wins, the
        // column edges stay at the source
        sel.pointer_move(&ctx, cell(9, 5));
        let Some(DragGesture::Filling { preview, .. }) = sel.drag() else {
            panic!("expected filling gesture");
        };
        assert_eq!(*preview, Some(AreaBounds::new(2, 2, 9, 3)));
    }

    #[test]
    fn test_fill_subset_cancels_preview() {
        let ctx = TestContext::new(20, 20);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(2, 2), cell(6, 6), SelectionMode::Clear);
        let _ = sel.pointer_up();
        sel.begin_fill(&ctx);
        sel.pointer_move(&ctx, cell(9, 2));
        sel.pointer_move(&ctx, cell(4, 4)); // back inside the source
        let Some(DragGesture::Filling { preview, .. }) = sel.drag() else {
            panic!("expected filling gesture");
        };
        assert_eq!(*preview, None);
        // Release with a cancelled preview commits nothing
        assert_eq!(sel.pointer_up(), None);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(2, 2, 6, 6));
    }

    #[test]
    fn test_fill_commit_replaces_last_region() {
        let ctx = TestContext::new(20, 20);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.new_selection(&ctx, cell(2, 2), cell(3, 3), SelectionMode::Clear);
        let _ = sel.pointer_up();
        sel.begin_fill(&ctx);
        sel.pointer_move(&ctx, cell(7, 2));
        let event = sel.pointer_up().unwrap();
        assert_eq!(
            event,
            SelectionEvent::FillCommitted {
                target: AreaBounds::new(2, 2, 7, 3),
                source: AreaBounds::new(2, 2, 3, 3)
            }
        );
        // Release reports the event; the region list waits for the commit
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(2, 2, 3, 3));
        sel.commit_fill(AreaBounds::new(2, 2, 7, 3));
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(2, 2, 7, 3));
    }

    #[test]
    fn test_select_all_spans_grid() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.select_all(&ctx);
        assert_eq!(sel.regions().len(), 1);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(0, 0, 99, 49));
    }

    #[test]
    fn test_row_and_column_spans() {
        let ctx = TestContext::new(100, 50);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.select_row_span(&ctx, 3, 5);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(3, 0, 5, 49));
        sel.select_column_span(&ctx, 7, 7);
        assert_eq!(sel.last_bounds().unwrap(), AreaBounds::new(0, 7, 99, 7));
    }

    #[test]
    fn test_entering_fill_cancels_other_gesture() {
        let ctx = TestContext::new(10, 10);
        let mut sel = SelectionState::new(SelectionPolicy::Multiple);
        sel.pointer_down(&ctx, cell(1, 1), false, false);
        assert!(matches!(sel.drag(), Some(DragGesture::Selecting)));
        sel.begin_fill(&ctx);
        assert!(matches!(sel.drag(), Some(DragGesture::Filling { .. })));
    }
}
