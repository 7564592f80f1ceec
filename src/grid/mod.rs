//! Grid composition and the external handle surface.
//!
//! [`Grid`] wires the axis caches, viewport, selection machine, and edit
//! controller together and exposes the host-facing API: scrolling, hit
//! testing, geometry queries, pointer/keyboard entry points, and the
//! per-frame render walk. Painting itself goes through the drawer traits in
//! [`crate::render`].

use serde::{Deserialize, Serialize};

use crate::editor::{next_edit_cell, CellEditor, EditSession, EditorEvent};
use crate::error::Result;
use crate::events::{
    Debounce, EventEmitter, HandlerId, Propagation, Throttle, SCROLL_SETTLE_DELAY_MS,
    WHEEL_SNAP_INTERVAL_MS,
};
use crate::layout::{
    aligned_offset, is_far_target, overscanned_range, visible_window, Align, AlignParams,
    AxisLayout, Viewport, ViewportBounds,
};
use crate::render::{CellDrawParams, CellDrawer, FrameParams, RegionDrawParams, SelectionRenderer};
use crate::selection::{DragGesture, GridContext, SelectionEvent, SelectionState};
use crate::types::{AreaBounds, CellCoordinate, CellRect, Direction, GridConfig, SelectionMode};

/// Restorable scroll position snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub scroll_x: f32,
    pub scroll_y: f32,
}

/// Modifier keys accompanying a pointer or keyboard event.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

/// Notification emitted to subscribed handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    Scrolled { x: f32, y: f32 },
    Selection(SelectionEvent),
    EditOpened { cell: CellCoordinate },
    EditSubmitted { cell: CellCoordinate, value: String },
    EditCancelled { cell: CellCoordinate },
}

/// Merged-span lookup built once from config.
struct MergeLookup {
    spans: Vec<AreaBounds>,
}

impl MergeLookup {
    fn new(spans: &[AreaBounds]) -> Self {
        Self {
            spans: spans.to_vec(),
        }
    }

    /// Span covering `cell`, if any.
    fn span_at(&self, cell: CellCoordinate) -> Option<AreaBounds> {
        self.spans.iter().find(|s| s.contains(cell)).copied()
    }

    /// Grow `bounds` until it covers every span it touches.
    fn expand(&self, bounds: AreaBounds) -> AreaBounds {
        let mut out = bounds;
        loop {
            let before = out;
            for span in &self.spans {
                if out.intersects(span) {
                    out = out.union(span);
                }
            }
            if out == before {
                return out;
            }
        }
    }
}

/// Everything the selection machine and editor need to see of the grid:
/// config, axes, viewport, merge table, and the deferred-scroll slot.
/// Split out of [`Grid`] so it can be borrowed as [`GridContext`] while the
/// machines are borrowed mutably alongside.
struct GridCore {
    config: GridConfig,
    rows: AxisLayout,
    columns: AxisLayout,
    viewport: Viewport,
    merges: MergeLookup,
    /// Scroll target too far outside the rendered window to apply
    /// immediately; consumed by the next `on_frame`.
    pending_scroll: Option<(CellCoordinate, Align)>,
    /// Indices invalidated by a resize since the last render pass.
    recalc_row_indices: Vec<u32>,
    recalc_column_indices: Vec<u32>,
    /// Strictly visible windows (inclusive), updated on every scroll.
    visible_rows: (u32, u32),
    visible_columns: (u32, u32),
    /// Rendered windows including overscan.
    render_rows: (u32, u32),
    render_columns: (u32, u32),
}

impl GridCore {
    fn frozen_width(&mut self) -> f32 {
        let fc = self.config.frozen_columns.min(self.config.column_count);
        if fc == 0 {
            0.0
        } else if fc == self.config.column_count {
            self.columns.estimated_total_size(fc)
        } else {
            self.columns.offset(fc, &*self.config.column_width)
        }
    }

    fn frozen_height(&mut self) -> f32 {
        let fr = self.config.frozen_rows.min(self.config.row_count);
        if fr == 0 {
            0.0
        } else if fr == self.config.row_count {
            self.rows.estimated_total_size(fr)
        } else {
            self.rows.offset(fr, &*self.config.row_height)
        }
    }

    fn total_width(&self) -> f32 {
        self.columns.estimated_total_size(self.config.column_count)
    }

    fn total_height(&self) -> f32 {
        self.rows.estimated_total_size(self.config.row_count)
    }

    fn clamp_scroll(&mut self) {
        let fw = self.frozen_width();
        let fh = self.frozen_height();
        let tw = self.total_width();
        let th = self.total_height();
        self.viewport.clamp_scroll(tw, th, fw, fh);
    }

    /// Recompute the visible and overscanned windows from the current
    /// scroll state.
    fn update_windows(&mut self) {
        let rows = visible_window(
            &mut self.rows,
            self.viewport.scroll_y,
            self.viewport.height,
            self.config.row_count,
            self.config.frozen_rows,
            &*self.config.row_height,
        )
        .unwrap_or((0, 0));
        let cols = visible_window(
            &mut self.columns,
            self.viewport.scroll_x,
            self.viewport.width,
            self.config.column_count,
            self.config.frozen_columns,
            &*self.config.column_width,
        )
        .unwrap_or((0, 0));

        self.visible_rows = rows;
        self.visible_columns = cols;
        self.render_rows = overscanned_range(
            rows,
            self.config.row_count,
            self.config.overscan_count,
            self.viewport.vertical_direction,
        );
        self.render_columns = overscanned_range(
            cols,
            self.config.column_count,
            self.config.overscan_count,
            self.viewport.horizontal_direction,
        );
    }

    fn viewport_bounds(&self) -> ViewportBounds {
        ViewportBounds {
            row_start_index: self.render_rows.0,
            row_stop_index: self.render_rows.1,
            column_start_index: self.render_columns.0,
            column_stop_index: self.render_columns.1,
            visible_row_start_index: self.visible_rows.0,
            visible_row_stop_index: self.visible_rows.1,
            visible_column_start_index: self.visible_columns.0,
            visible_column_stop_index: self.visible_columns.1,
        }
    }

    /// Screen x of a column's leading edge. Frozen columns ignore scroll;
    /// scrollable content renders shifted so the item at the scroll offset
    /// lands at the frozen boundary.
    fn column_screen_offset(&mut self, col: u32) -> f32 {
        let offset = self.columns.offset(col, &*self.config.column_width);
        if col < self.config.frozen_columns {
            offset
        } else {
            let fw = self.frozen_width();
            offset - self.viewport.scroll_x + fw
        }
    }

    fn row_screen_offset(&mut self, row: u32) -> f32 {
        let offset = self.rows.offset(row, &*self.config.row_height);
        if row < self.config.frozen_rows {
            offset
        } else {
            let fh = self.frozen_height();
            offset - self.viewport.scroll_y + fh
        }
    }

    /// Screen rect covering `bounds`.
    fn bounds_rect(&mut self, bounds: AreaBounds) -> CellRect {
        let x = self.column_screen_offset(bounds.left);
        let y = self.row_screen_offset(bounds.top);
        let x0 = self.columns.offset(bounds.left, &*self.config.column_width);
        let x1 = self.columns.offset(bounds.right, &*self.config.column_width)
            + self
                .columns
                .measured_size(bounds.right, &*self.config.column_width);
        let y0 = self.rows.offset(bounds.top, &*self.config.row_height);
        let y1 = self.rows.offset(bounds.bottom, &*self.config.row_height)
            + self
                .rows
                .measured_size(bounds.bottom, &*self.config.row_height);
        CellRect {
            x,
            y,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    fn cell_rect(&mut self, cell: CellCoordinate) -> CellRect {
        self.bounds_rect(AreaBounds::single(cell))
    }

    /// Apply an alignment scroll for `cell` immediately.
    fn apply_scroll_to(&mut self, cell: CellCoordinate, align: Align) {
        let row_params = AlignParams {
            index: cell.row_index,
            count: self.config.row_count,
            frozen_count: self.config.frozen_rows,
            scroll_offset: self.viewport.scroll_y,
            container_extent: self.viewport.height,
        };
        if let Some(y) = aligned_offset(&mut self.rows, row_params, align, &*self.config.row_height)
        {
            self.viewport.scroll_y = y;
        }
        let col_params = AlignParams {
            index: cell.column_index,
            count: self.config.column_count,
            frozen_count: self.config.frozen_columns,
            scroll_offset: self.viewport.scroll_x,
            container_extent: self.viewport.width,
        };
        if let Some(x) = aligned_offset(
            &mut self.columns,
            col_params,
            align,
            &*self.config.column_width,
        ) {
            self.viewport.scroll_x = x;
        }
        self.clamp_scroll();
        self.update_windows();
    }

    fn is_far(&self, cell: CellCoordinate) -> bool {
        is_far_target(cell.row_index, self.render_rows.0, self.render_rows.1)
            || is_far_target(
                cell.column_index,
                self.render_columns.0,
                self.render_columns.1,
            )
    }
}

impl GridContext for GridCore {
    fn row_count(&self) -> u32 {
        self.config.row_count
    }

    fn column_count(&self) -> u32 {
        self.config.column_count
    }

    fn is_row_hidden(&self, row: u32) -> bool {
        self.config.is_row_hidden(row)
    }

    fn is_column_hidden(&self, col: u32) -> bool {
        self.config.is_column_hidden(col)
    }

    fn expand_bounds(&self, bounds: AreaBounds) -> AreaBounds {
        self.merges.expand(bounds)
    }

    fn visible_rows(&self) -> (u32, u32) {
        self.visible_rows
    }

    fn visible_columns(&self) -> (u32, u32) {
        self.visible_columns
    }

    fn scroll_to_cell(&mut self, cell: CellCoordinate) {
        if self.is_far(cell) {
            // Defer one frame so geometry is recomputed before the jump
            self.pending_scroll = Some((cell, Align::Smart));
        } else {
            self.apply_scroll_to(cell, Align::Smart);
        }
    }
}

/// Virtualized grid engine.
pub struct Grid {
    core: GridCore,
    selection: SelectionState,
    editor: CellEditor,
    scroll_settle: Debounce,
    wheel_snap: Throttle,
    /// Wheel deltas received while the snap throttle was closed.
    wheel_accum: Option<(f32, f32)>,
    events: EventEmitter<GridEvent>,
}

impl Grid {
    pub fn new(config: GridConfig) -> Self {
        let mut rows = AxisLayout::new(config.estimated_row_height);
        let mut columns = AxisLayout::new(config.estimated_column_width);
        rows.set_scale(config.scale);
        columns.set_scale(config.scale);

        let mut viewport = Viewport::new();
        viewport.scroll_x = config.initial_scroll.0;
        viewport.scroll_y = config.initial_scroll.1;

        let merges = MergeLookup::new(&config.merged_cells);
        let policy = config.selection_policy;

        let mut core = GridCore {
            config,
            rows,
            columns,
            viewport,
            merges,
            pending_scroll: None,
            recalc_row_indices: Vec::new(),
            recalc_column_indices: Vec::new(),
            visible_rows: (0, 0),
            visible_columns: (0, 0),
            render_rows: (0, 0),
            render_columns: (0, 0),
        };
        core.clamp_scroll();
        core.update_windows();

        Self {
            core,
            selection: SelectionState::new(policy),
            editor: CellEditor::new(),
            scroll_settle: Debounce::new(SCROLL_SETTLE_DELAY_MS),
            wheel_snap: Throttle::new(WHEEL_SNAP_INTERVAL_MS),
            wheel_accum: None,
            events: EventEmitter::new(),
        }
    }

    // ------------------------------------------------------------------
    // Container and scale
    // ------------------------------------------------------------------

    pub fn resize(&mut self, width: f32, height: f32) {
        debug_assert!(width.is_finite() && height.is_finite());
        self.core.viewport.resize(width, height);
        self.core.clamp_scroll();
        self.core.update_windows();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.core.rows.set_scale(scale);
        self.core.columns.set_scale(scale);
        self.core.clamp_scroll();
        self.core.update_windows();
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    /// Absolute scroll to `(x, y)`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        debug_assert!(x.is_finite() && y.is_finite());
        let dx = x - self.core.viewport.scroll_x;
        let dy = y - self.core.viewport.scroll_y;
        self.scroll_by(dx, dy);
    }

    /// Relative scroll by `(delta_x, delta_y)`, clamped.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) {
        debug_assert!(delta_x.is_finite() && delta_y.is_finite());
        self.core.viewport.scroll_by(delta_x, delta_y);
        self.core.clamp_scroll();
        self.core.update_windows();
        let (x, y) = (self.core.viewport.scroll_x, self.core.viewport.scroll_y);
        self.events.emit(&GridEvent::Scrolled { x, y });
    }

    /// Host scroll event: applies the position and suspends hit testing
    /// until the settle delay elapses without further events.
    pub fn on_scroll_event(&mut self, x: f32, y: f32, now: f64) {
        self.core.viewport.is_scrolling = true;
        self.scroll_settle.record(now);
        self.scroll_to(x, y);
    }

    /// Wheel input, coalesced to one applied scroll per snap interval.
    /// Deltas arriving while the interval is closed accumulate and apply
    /// at the next open interval or frame; nothing is dropped.
    pub fn handle_wheel(&mut self, delta_x: f32, delta_y: f32, now: f64) {
        debug_assert!(delta_x.is_finite() && delta_y.is_finite());
        let (ax, ay) = self.wheel_accum.get_or_insert((0.0, 0.0));
        *ax += delta_x;
        *ay += delta_y;
        self.flush_wheel(now);
    }

    /// Apply the accumulated wheel delta if the snap interval is open.
    fn flush_wheel(&mut self, now: f64) -> bool {
        if self.wheel_accum.is_none() || !self.wheel_snap.ready(now) {
            return false;
        }
        let Some((dx, dy)) = self.wheel_accum.take() else {
            return false;
        };
        self.core.viewport.is_scrolling = true;
        self.scroll_settle.record(now);
        self.scroll_by(dx, dy);
        true
    }

    /// Scroll so `cell` satisfies `align`. Far targets (more than one
    /// viewport beyond the rendered window) are deferred to the next
    /// `on_frame` so geometry settles first.
    pub fn scroll_to_item(&mut self, cell: CellCoordinate, align: Align) {
        if cell.row_index >= self.core.config.row_count
            || cell.column_index >= self.core.config.column_count
        {
            return;
        }
        if self.core.is_far(cell) {
            self.core.pending_scroll = Some((cell, align));
            return;
        }
        self.core.apply_scroll_to(cell, align);
        let (x, y) = (self.core.viewport.scroll_x, self.core.viewport.scroll_y);
        self.events.emit(&GridEvent::Scrolled { x, y });
    }

    /// Per-frame tick: drains throttled wheel input, clears the scrolling
    /// flag once settled, and applies any deferred scroll. Returns true
    /// when a redraw is needed.
    pub fn on_frame(&mut self, now: f64) -> bool {
        let mut dirty = self.flush_wheel(now);
        if self.scroll_settle.fire(now) {
            self.core.viewport.is_scrolling = false;
            dirty = true;
        }
        if let Some((cell, align)) = self.core.pending_scroll.take() {
            self.core.apply_scroll_to(cell, align);
            let (x, y) = (self.core.viewport.scroll_x, self.core.viewport.scroll_y);
            self.events.emit(&GridEvent::Scrolled { x, y });
            dirty = true;
        }
        dirty
    }

    pub fn is_scrolling(&self) -> bool {
        self.core.viewport.is_scrolling
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            scroll_x: self.core.viewport.scroll_x,
            scroll_y: self.core.viewport.scroll_y,
        }
    }

    pub fn set_scroll_state(&mut self, state: ScrollState) {
        self.scroll_to(state.scroll_x, state.scroll_y);
    }

    // ------------------------------------------------------------------
    // Geometry queries
    // ------------------------------------------------------------------

    pub fn get_viewport(&self) -> ViewportBounds {
        self.core.viewport_bounds()
    }

    /// Index-space bounds of `cell`, expanded to its full merged span.
    pub fn get_cell_bounds(&self, cell: CellCoordinate) -> Option<AreaBounds> {
        if cell.row_index >= self.core.config.row_count
            || cell.column_index >= self.core.config.column_count
        {
            return None;
        }
        Some(
            self.core
                .merges
                .span_at(cell)
                .unwrap_or_else(|| AreaBounds::single(cell)),
        )
    }

    /// Content-space rect of `cell` (unaffected by scroll, no merge
    /// expansion).
    pub fn get_cell_offset_from_coords(&mut self, cell: CellCoordinate) -> Option<CellRect> {
        if cell.row_index >= self.core.config.row_count
            || cell.column_index >= self.core.config.column_count
        {
            return None;
        }
        let x = self
            .core
            .columns
            .offset(cell.column_index, &*self.core.config.column_width);
        let y = self
            .core
            .rows
            .offset(cell.row_index, &*self.core.config.row_height);
        let width = self
            .core
            .columns
            .measured_size(cell.column_index, &*self.core.config.column_width);
        let height = self
            .core
            .rows
            .measured_size(cell.row_index, &*self.core.config.row_height);
        Some(CellRect {
            x,
            y,
            width,
            height,
        })
    }

    /// Hit test a container pixel position to a cell.
    ///
    /// Suspended (returns `None`) while a scroll is settling. With
    /// `include_frozen`, positions over the frozen bands resolve to frozen
    /// cells; otherwise they miss.
    pub fn get_cell_coords_from_offset(
        &mut self,
        x: f32,
        y: f32,
        include_frozen: bool,
    ) -> Option<CellCoordinate> {
        debug_assert!(x.is_finite() && y.is_finite());
        if self.core.viewport.is_scrolling {
            return None;
        }
        if x < 0.0 || y < 0.0 {
            return None;
        }

        let fw = self.core.frozen_width();
        let fh = self.core.frozen_height();

        let col = if x < fw {
            if !include_frozen {
                return None;
            }
            self.core.columns.index_at_offset(
                x,
                self.core.config.column_count,
                &*self.core.config.column_width,
            )?
        } else {
            let content_x = x - fw + self.core.viewport.scroll_x;
            if content_x > self.core.total_width() {
                return None;
            }
            self.core.columns.index_at_offset(
                content_x,
                self.core.config.column_count,
                &*self.core.config.column_width,
            )?
        };

        let row = if y < fh {
            if !include_frozen {
                return None;
            }
            self.core.rows.index_at_offset(
                y,
                self.core.config.row_count,
                &*self.core.config.row_height,
            )?
        } else {
            let content_y = y - fh + self.core.viewport.scroll_y;
            if content_y > self.core.total_height() {
                return None;
            }
            self.core.rows.index_at_offset(
                content_y,
                self.core.config.row_count,
                &*self.core.config.row_height,
            )?
        };

        Some(CellCoordinate::new(row, col))
    }

    pub fn get_row_offset(&mut self, row: u32) -> Option<f32> {
        (row < self.core.config.row_count)
            .then(|| self.core.rows.offset(row, &*self.core.config.row_height))
    }

    pub fn get_column_offset(&mut self, col: u32) -> Option<f32> {
        (col < self.core.config.column_count).then(|| {
            self.core
                .columns
                .offset(col, &*self.core.config.column_width)
        })
    }

    pub fn get_row_height(&mut self, row: u32) -> Option<f32> {
        (row < self.core.config.row_count).then(|| {
            self.core
                .rows
                .measured_size(row, &*self.core.config.row_height)
        })
    }

    pub fn get_column_width(&mut self, col: u32) -> Option<f32> {
        (col < self.core.config.column_count).then(|| {
            self.core
                .columns
                .measured_size(col, &*self.core.config.column_width)
        })
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Invalidate cached column metadata from the smallest index in
    /// `indices`. The indices are queued for the next render pass.
    pub fn resize_columns(&mut self, indices: &[u32]) {
        let Some(&min) = indices.iter().min() else {
            return;
        };
        self.core.columns.invalidate(min);
        self.core.recalc_column_indices.extend_from_slice(indices);
        self.core.clamp_scroll();
        self.core.update_windows();
    }

    /// Row counterpart of [`Grid::resize_columns`].
    pub fn resize_rows(&mut self, indices: &[u32]) {
        let Some(&min) = indices.iter().min() else {
            return;
        };
        self.core.rows.invalidate(min);
        self.core.recalc_row_indices.extend_from_slice(indices);
        self.core.clamp_scroll();
        self.core.update_windows();
    }

    /// Indices queued since the last render pass.
    pub fn pending_recalc(&self) -> (&[u32], &[u32]) {
        (
            &self.core.recalc_row_indices,
            &self.core.recalc_column_indices,
        )
    }

    // ------------------------------------------------------------------
    // Selection and focus
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn active_cell(&self) -> Option<CellCoordinate> {
        self.selection.active_cell()
    }

    /// Replace the selection with a single cell.
    pub fn select_cell(&mut self, cell: CellCoordinate) {
        self.selection
            .new_selection(&self.core, cell, cell, SelectionMode::Clear);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.core);
    }

    /// Ensure an active cell exists, defaulting to the first focusable
    /// cell.
    pub fn focus(&mut self) {
        if self.selection.active_cell().is_some() {
            return;
        }
        let row = (0..self.core.config.row_count).find(|r| !self.core.config.is_row_hidden(*r));
        let col =
            (0..self.core.config.column_count).find(|c| !self.core.config.is_column_hidden(*c));
        if let (Some(row), Some(col)) = (row, col) {
            self.select_cell(CellCoordinate::new(row, col));
        }
    }

    // ------------------------------------------------------------------
    // Pointer entry points
    // ------------------------------------------------------------------

    /// Pointer-down at a container pixel position.
    pub fn pointer_down(&mut self, x: f32, y: f32, mods: KeyModifiers) {
        let Some(cell) = self.get_cell_coords_from_offset(x, y, true) else {
            return;
        };
        self.selection
            .pointer_down(&self.core, cell, mods.shift, mods.ctrl || mods.meta);
    }

    /// Pointer-down on a selection border to start a drag-move.
    pub fn begin_drag(&mut self, x: f32, y: f32) {
        let Some(cell) = self.get_cell_coords_from_offset(x, y, true) else {
            return;
        };
        self.selection.begin_drag(&self.core, cell);
    }

    /// Pointer-down on the fill handle.
    pub fn begin_fill(&mut self) {
        self.selection.begin_fill(&self.core);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some(cell) = self.get_cell_coords_from_offset(x, y, true) else {
            return;
        };
        self.selection.pointer_move(&self.core, cell);
    }

    pub fn pointer_up(&mut self) {
        let Some(event) = self.selection.pointer_up() else {
            return;
        };
        // onFill observes the pre-commit region list
        let fill_target = match &event {
            SelectionEvent::FillCommitted { target, .. } => Some(*target),
            _ => None,
        };
        self.dispatch_selection(event);
        if let Some(target) = fill_target {
            self.selection.commit_fill(target);
        }
    }

    fn dispatch_selection(&mut self, event: SelectionEvent) {
        let callbacks = &mut self.core.config.callbacks;
        match &event {
            SelectionEvent::SelectionEnd { anchor, focus } => {
                if let Some(cb) = &mut callbacks.on_selection_end {
                    cb(*anchor, *focus);
                }
            }
            SelectionEvent::SegmentMoved { from, to } => {
                if let Some(cb) = &mut callbacks.on_segment_move {
                    cb(*from, *to);
                }
            }
            SelectionEvent::FillCommitted { target, source } => {
                if let Some(cb) = &mut callbacks.on_fill {
                    cb(*target, *source);
                }
            }
        }
        self.events.emit(&GridEvent::Selection(event));
    }

    // ------------------------------------------------------------------
    // Keyboard entry point
    // ------------------------------------------------------------------

    /// Route a key to the editor or the selection machine. Returns true
    /// when the key was consumed.
    pub fn handle_key(&mut self, key: &str, mods: KeyModifiers) -> bool {
        if self.editor.is_open() {
            return match key {
                "Enter" => {
                    self.submit_edit(Some(Direction::Down));
                    true
                }
                "Tab" => {
                    let direction = if mods.shift {
                        Direction::Left
                    } else {
                        Direction::Right
                    };
                    self.submit_edit(Some(direction));
                    true
                }
                "Escape" => {
                    self.cancel_edit();
                    true
                }
                _ => false,
            };
        }

        match key {
            "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => {
                let direction = match key {
                    "ArrowUp" => Direction::Up,
                    "ArrowDown" => Direction::Down,
                    "ArrowLeft" => Direction::Left,
                    _ => Direction::Right,
                };
                self.selection
                    .key_navigate(&mut self.core, direction, mods.shift, mods.ctrl);
                true
            }
            "Tab" => {
                self.selection.tab_navigate(&mut self.core, mods.shift);
                true
            }
            "PageUp" | "PageDown" => {
                // Alt pages horizontally
                let direction = match (key == "PageUp", mods.alt) {
                    (true, false) => Direction::Up,
                    (false, false) => Direction::Down,
                    (true, true) => Direction::Left,
                    (false, true) => Direction::Right,
                };
                self.selection
                    .page_navigate(&mut self.core, direction, mods.shift);
                true
            }
            "Home" | "End" => {
                self.selection
                    .edge_navigate(&mut self.core, key == "End", mods.ctrl, mods.shift);
                true
            }
            " " if mods.shift => {
                self.selection.select_active_row(&mut self.core);
                true
            }
            " " if mods.ctrl => {
                self.selection.select_active_column(&mut self.core);
                true
            }
            "a" | "A" if mods.ctrl || mods.meta => {
                self.selection.select_all(&self.core);
                true
            }
            "Enter" | "F2" => {
                if let Some(active) = self.selection.active_cell() {
                    self.make_editable(active, None, true, false);
                }
                true
            }
            "Delete" | "Backspace" => {
                self.delete_selection();
                true
            }
            _ => {
                // A single printable character seeds a new edit session
                if mods.ctrl || mods.meta || mods.alt || key.chars().count() != 1 {
                    return false;
                }
                if let Some(active) = self.selection.active_cell() {
                    self.make_editable(active, Some(key.to_string()), true, true);
                    return true;
                }
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.session()
    }

    /// Open an edit session over `cell`'s merged span, sized to grow up to
    /// the container edge.
    pub fn make_editable(
        &mut self,
        cell: CellCoordinate,
        initial_value: Option<String>,
        auto_focus: bool,
        has_initial_value: bool,
    ) {
        if !self.core.config.is_cell_focusable(cell) {
            return;
        }
        let bounds = self
            .core
            .merges
            .span_at(cell)
            .unwrap_or_else(|| AreaBounds::single(cell));
        let rect = self.core.bounds_rect(bounds);
        let max_width = (self.core.viewport.width - rect.x).max(rect.width);
        let max_height = (self.core.viewport.height - rect.y).max(rect.height);
        if let Some(EditorEvent::Opened { cell }) = self.editor.open(
            cell,
            rect,
            (max_width, max_height),
            initial_value,
            has_initial_value,
            auto_focus,
        ) {
            self.events.emit(&GridEvent::EditOpened { cell });
        }
    }

    /// Update the open session's live value.
    pub fn set_edit_value(&mut self, value: &str) {
        self.editor.set_value(value);
    }

    /// Submit the open session, optionally moving the active cell.
    pub fn submit_edit(&mut self, move_direction: Option<Direction>) {
        let Some(session) = self.editor.session() else {
            return;
        };
        let (cell, value) = (session.cell, session.value.clone());
        let next = move_direction
            .and_then(|d| next_edit_cell(&self.core, self.selection.last_bounds(), cell, d));
        let Some(EditorEvent::Submitted {
            cell,
            value,
            next_cell,
        }) = self.editor.submit(&self.core, value, next)
        else {
            return;
        };
        if let Some(cb) = &mut self.core.config.callbacks.on_edit_submit {
            cb(cell, value.clone());
        }
        if let Some(next) = next_cell {
            // Movement captured by a multi-cell region keeps that region
            // selected; only a plain move replaces the selection
            let captured = self
                .selection
                .last_bounds()
                .is_some_and(|b| !b.is_single_cell() && b.contains(next));
            if captured {
                self.selection.set_active_cell(&self.core, next);
            } else {
                self.selection
                    .new_selection(&self.core, next, next, SelectionMode::Clear);
            }
            self.core.scroll_to_cell(next);
        }
        self.events.emit(&GridEvent::EditSubmitted { cell, value });
    }

    /// Discard the open session.
    pub fn cancel_edit(&mut self) {
        let Some(EditorEvent::Cancelled { cell }) = self.editor.cancel() else {
            return;
        };
        if let Some(cb) = &mut self.core.config.callbacks.on_edit_cancel {
            cb(cell);
        }
        self.events.emit(&GridEvent::EditCancelled { cell });
    }

    /// Focus left the grid: a dirty session submits, a clean one cancels.
    pub fn blur(&mut self) {
        match self.editor.session() {
            Some(s) if s.is_dirty => self.submit_edit(None),
            Some(_) => self.cancel_edit(),
            None => {}
        }
    }

    /// Delete over the current selection (or the active cell) without
    /// opening a session.
    pub fn delete_selection(&mut self) {
        let bounds = self
            .selection
            .last_bounds()
            .or_else(|| self.selection.active_cell().map(AreaBounds::single));
        let Some(bounds) = bounds else {
            return;
        };
        if let Some(cb) = &mut self.core.config.callbacks.on_edit_delete {
            cb(bounds);
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&GridEvent, &mut Propagation) + 'static,
    ) -> HandlerId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: HandlerId) {
        self.events.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Walk the visible geometry, feeding the drawers: scrollable window
    /// first, then frozen bands, then selection overlays. Consumes the
    /// pending recalc lists.
    pub fn render(
        &mut self,
        cells: &mut dyn CellDrawer,
        overlay: &mut dyn SelectionRenderer,
    ) -> Result<()> {
        self.core.recalc_row_indices.clear();
        self.core.recalc_column_indices.clear();
        self.core.update_windows();

        let frame = FrameParams {
            viewport: self.core.viewport_bounds(),
            scale: self.core.rows.scale(),
            width: self.core.viewport.width,
            height: self.core.viewport.height,
        };
        cells.begin_frame(&frame)?;

        if self.core.config.row_count > 0 && self.core.config.column_count > 0 {
            let (r0, r1) = self.core.render_rows;
            let (c0, c1) = self.core.render_columns;
            let window = AreaBounds::new(r0, c0, r1, c1);

            // Scrollable window, skipping merge-covered cells
            for row in r0..=r1 {
                if self.core.config.is_row_hidden(row) {
                    continue;
                }
                for col in c0..=c1 {
                    let cell = CellCoordinate::new(row, col);
                    if self.core.config.is_column_hidden(col)
                        || self.core.merges.span_at(cell).is_some()
                    {
                        continue;
                    }
                    let rect = self.core.cell_rect(cell);
                    cells.draw_cell(&CellDrawParams {
                        cell,
                        rect,
                        is_frozen_row: false,
                        is_frozen_column: false,
                        is_merge_origin: false,
                    })?;
                }
            }

            // Merged spans draw once at their origin, even when the origin
            // sits outside the window
            let spans: Vec<AreaBounds> = self
                .core
                .merges
                .spans
                .iter()
                .filter(|s| s.intersects(&window))
                .copied()
                .collect();
            for span in spans {
                let rect = self.core.bounds_rect(span);
                cells.draw_cell(&CellDrawParams {
                    cell: span.top_left(),
                    rect,
                    is_frozen_row: false,
                    is_frozen_column: false,
                    is_merge_origin: true,
                })?;
            }

            self.render_frozen_bands(cells, (r0, r1), (c0, c1))?;
        }

        cells.end_frame()?;
        self.render_overlays(overlay)
    }

    fn render_frozen_bands(
        &mut self,
        cells: &mut dyn CellDrawer,
        rows: (u32, u32),
        cols: (u32, u32),
    ) -> Result<()> {
        let frozen_rows = self.core.config.frozen_rows.min(self.core.config.row_count);
        let frozen_cols = self
            .core
            .config
            .frozen_columns
            .min(self.core.config.column_count);

        // Frozen rows over the scrollable columns
        for row in 0..frozen_rows {
            if self.core.config.is_row_hidden(row) {
                continue;
            }
            for col in cols.0..=cols.1 {
                if self.core.config.is_column_hidden(col) {
                    continue;
                }
                let cell = CellCoordinate::new(row, col);
                let rect = self.core.cell_rect(cell);
                cells.draw_cell(&CellDrawParams {
                    cell,
                    rect,
                    is_frozen_row: true,
                    is_frozen_column: false,
                    is_merge_origin: false,
                })?;
            }
        }

        // Frozen columns beside the scrollable rows
        for row in rows.0..=rows.1 {
            if self.core.config.is_row_hidden(row) {
                continue;
            }
            for col in 0..frozen_cols {
                if self.core.config.is_column_hidden(col) {
                    continue;
                }
                let cell = CellCoordinate::new(row, col);
                let rect = self.core.cell_rect(cell);
                cells.draw_cell(&CellDrawParams {
                    cell,
                    rect,
                    is_frozen_row: false,
                    is_frozen_column: true,
                    is_merge_origin: false,
                })?;
            }
        }

        // Corner band
        for row in 0..frozen_rows {
            if self.core.config.is_row_hidden(row) {
                continue;
            }
            for col in 0..frozen_cols {
                if self.core.config.is_column_hidden(col) {
                    continue;
                }
                let cell = CellCoordinate::new(row, col);
                let rect = self.core.cell_rect(cell);
                cells.draw_cell(&CellDrawParams {
                    cell,
                    rect,
                    is_frozen_row: true,
                    is_frozen_column: true,
                    is_merge_origin: false,
                })?;
            }
        }
        Ok(())
    }

    fn render_overlays(&mut self, overlay: &mut dyn SelectionRenderer) -> Result<()> {
        let count = self.selection.regions().len();
        let regions: Vec<_> = self.selection.regions().to_vec();
        for (i, region) in regions.iter().enumerate() {
            let rect = self.core.bounds_rect(region.bounds);
            overlay.draw_region(&RegionDrawParams {
                bounds: region.bounds,
                rect,
                in_progress: region.in_progress,
                is_current: i + 1 == count,
                style: region.style.clone(),
            })?;
        }

        if let Some(active) = self.selection.active_cell() {
            let bounds = self
                .core
                .merges
                .span_at(active)
                .unwrap_or_else(|| AreaBounds::single(active));
            let rect = self.core.bounds_rect(bounds);
            overlay.draw_active_cell(&rect)?;
        }

        match self.selection.drag() {
            Some(DragGesture::Dragging { preview, .. }) => {
                let rect = self.core.bounds_rect(*preview);
                overlay.draw_drag_preview(&rect)?;
            }
            Some(DragGesture::Filling {
                preview: Some(preview),
                ..
            }) => {
                let rect = self.core.bounds_rect(*preview);
                overlay.draw_fill_preview(&rect)?;
            }
            _ => {}
        }
        Ok(())
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
    use super::*;
    use crate::types::{GridCallbacks, SelectionPolicy};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config(rows: u32, cols: u32) -> GridConfig {
        GridConfig {
            row_count: rows,
            column_count: cols,
            selection_policy: SelectionPolicy::Multiple,
            ..GridConfig::default()
        }
    }

    fn grid(rows: u32, cols: u32) -> Grid {
        let mut g = Grid::new(config(rows, cols));
        g.resize(400.0, 400.0);
        g
    }

    fn cell(r: u32, c: u32) -> CellCoordinate {
        CellCoordinate::new(r, c)
    }

    #[derive(Default)]
    struct Recorder {
        cells: Vec<CellDrawParams>,
        regions: Vec<RegionDrawParams>,
        active: Vec<CellRect>,
        frames: u32,
    }

    impl CellDrawer for Recorder {
        fn begin_frame(&mut self, _frame: &FrameParams) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
        fn draw_cell(&mut self, params: &CellDrawParams) -> Result<()> {
            self.cells.push(params.clone());
            Ok(())
        }
    }

    impl SelectionRenderer for Recorder {
        fn draw_region(&mut self, params: &RegionDrawParams) -> Result<()> {
            self.regions.push(params.clone());
            Ok(())
        }
        fn draw_active_cell(&mut self, rect: &CellRect) -> Result<()> {
            self.active.push(*rect);
            Ok(())
        }
    }

    #[test]
    fn test_scenario_uniform_window_through_handle() {
        // 1000 rows at 20px, container 400, scrollTop 205, overscan 1
        let mut g = grid(1000, 10);
        g.scroll_to(0.0, 205.0);
        let vp = g.get_viewport();
        assert_eq!(vp.visible_row_start_index, 10);
        assert_eq!(vp.visible_row_stop_index, 30);
        assert_eq!(vp.row_start_index, 9);
        assert_eq!(vp.row_stop_index, 31);
    }

    #[test]
    fn test_scroll_clamps_to_frozen_minimum() {
        let mut g = Grid::new(GridConfig {
            frozen_rows: 2,
            frozen_columns: 1,
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        g.scroll_to(-50.0, -50.0);
        let s = g.scroll_state();
        // 1 frozen col at 64px, 2 frozen rows at 20px
        assert_eq!(s.scroll_x, 64.0);
        assert_eq!(s.scroll_y, 40.0);
    }

    #[test]
    fn test_hit_test_round_trips_scroll() {
        let mut g = grid(1000, 100);
        g.scroll_to(128.0, 205.0);
        // Pixel (10, 10): content y = 215 -> row 10; content x = 138 -> col 2
        assert_eq!(
            g.get_cell_coords_from_offset(10.0, 10.0, true),
            Some(cell(10, 2))
        );
    }

    #[test]
    fn test_hit_test_suspended_while_scrolling() {
        let mut g = grid(100, 10);
        g.on_scroll_event(0.0, 40.0, 1000.0);
        assert!(g.is_scrolling());
        assert_eq!(g.get_cell_coords_from_offset(10.0, 10.0, true), None);

        // Settles after the debounce delay
        assert!(g.on_frame(1100.0));
        assert!(!g.is_scrolling());
        assert!(g.get_cell_coords_from_offset(10.0, 10.0, true).is_some());
    }

    #[test]
    fn test_hit_test_frozen_band() {
        let mut g = Grid::new(GridConfig {
            frozen_rows: 2,
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        g.scroll_to(0.0, 400.0);
        // y=10 is inside the frozen band
        assert_eq!(
            g.get_cell_coords_from_offset(10.0, 10.0, true),
            Some(cell(0, 0))
        );
        assert_eq!(g.get_cell_coords_from_offset(10.0, 10.0, false), None);
        // y=50 is 10px into the scrollable area: content y = 410 -> row 20
        assert_eq!(
            g.get_cell_coords_from_offset(10.0, 50.0, true),
            Some(cell(20, 0))
        );
    }

    #[test]
    fn test_cell_bounds_merge_expanded() {
        let mut g = Grid::new(GridConfig {
            merged_cells: vec![AreaBounds::new(1, 1, 2, 3)],
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        // Any covered cell reports the whole span
        assert_eq!(g.get_cell_bounds(cell(2, 2)), Some(AreaBounds::new(1, 1, 2, 3)));
        assert_eq!(g.get_cell_bounds(cell(0, 0)), Some(AreaBounds::single(cell(0, 0))));
        assert!(g.get_cell_bounds(cell(200, 0)).is_none());
    }

    #[test]
    fn test_resize_rows_invalidates_and_queues() {
        let mut g = grid(100, 10);
        assert_eq!(g.get_row_offset(10), Some(200.0));
        g.resize_rows(&[5, 7]);
        assert_eq!(g.pending_recalc().0, &[5, 7]);

        // Render consumes the queue
        let mut rec = Recorder::default();
        let mut overlay = Recorder::default();
        g.render(&mut rec, &mut overlay).unwrap();
        assert!(g.pending_recalc().0.is_empty());
    }

    #[test]
    fn test_scroll_to_item_far_target_deferred() {
        let mut g = grid(1000, 10);
        g.scroll_to_item(cell(500, 0), Align::Start);
        // Not applied yet
        assert_eq!(g.scroll_state().scroll_y, 0.0);
        assert!(g.on_frame(0.0));
        assert_eq!(g.scroll_state().scroll_y, 10_000.0);
        let vp = g.get_viewport();
        assert_eq!(vp.visible_row_start_index, 500);
    }

    #[test]
    fn test_scroll_to_item_near_target_immediate() {
        let mut g = grid(1000, 10);
        g.scroll_to_item(cell(30, 0), Align::Start);
        assert_eq!(g.scroll_state().scroll_y, 600.0);
    }

    #[test]
    fn test_pointer_flow_fires_selection_end() {
        let ends = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ends);
        let mut g = Grid::new(GridConfig {
            callbacks: GridCallbacks {
                on_selection_end: Some(Box::new(move |anchor, focus| {
                    sink.borrow_mut().push((anchor, focus));
                })),
                ..GridCallbacks::default()
            },
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);

        g.pointer_down(10.0, 10.0, KeyModifiers::default()); // cell (0,0)
        g.pointer_move(100.0, 50.0); // cell (2,1)
        g.pointer_up();
        assert_eq!(*ends.borrow(), vec![(cell(0, 0), cell(2, 1))]);
        assert_eq!(
            g.selection().last_bounds().unwrap(),
            AreaBounds::new(0, 0, 2, 1)
        );
    }

    #[test]
    fn test_scenario_keystroke_edit_and_submit() {
        // Active cell (1,1), no session; "x" opens dirty, Enter submits and
        // moves down
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&submitted);
        let mut g = Grid::new(GridConfig {
            callbacks: GridCallbacks {
                on_edit_submit: Some(Box::new(move |cell, value| {
                    sink.borrow_mut().push((cell, value));
                })),
                ..GridCallbacks::default()
            },
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        g.select_cell(cell(1, 1));

        assert!(g.handle_key("x", KeyModifiers::default()));
        let session = g.edit_session().unwrap();
        assert_eq!(session.initial_value, "x");
        assert!(session.is_dirty);

        assert!(g.handle_key("Enter", KeyModifiers::default()));
        assert!(g.edit_session().is_none());
        assert_eq!(*submitted.borrow(), vec![(cell(1, 1), "x".to_string())]);
        assert_eq!(g.active_cell(), Some(cell(2, 1)));
    }

    #[test]
    fn test_escape_cancels_without_submit() {
        let mut g = grid(100, 10);
        g.select_cell(cell(1, 1));
        g.handle_key("q", KeyModifiers::default());
        assert!(g.edit_session().is_some());
        assert!(g.handle_key("Escape", KeyModifiers::default()));
        assert!(g.edit_session().is_none());
        assert_eq!(g.active_cell(), Some(cell(1, 1)));
    }

    #[test]
    fn test_delete_fires_without_session() {
        let deleted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&deleted);
        let mut g = Grid::new(GridConfig {
            callbacks: GridCallbacks {
                on_edit_delete: Some(Box::new(move |bounds| {
                    sink.borrow_mut().push(bounds);
                })),
                ..GridCallbacks::default()
            },
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        g.select_cell(cell(3, 3));
        assert!(g.handle_key("Delete", KeyModifiers::default()));
        assert!(g.edit_session().is_none());
        assert_eq!(*deleted.borrow(), vec![AreaBounds::new(3, 3, 3, 3)]);
    }

    #[test]
    fn test_blur_submits_only_when_dirty() {
        let submitted = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&submitted);
        let mut g = Grid::new(GridConfig {
            callbacks: GridCallbacks {
                on_edit_submit: Some(Box::new(move |_, _| *sink.borrow_mut() += 1)),
                ..GridCallbacks::default()
            },
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        g.select_cell(cell(1, 1));

        // Clean session: blur cancels
        g.handle_key("Enter", KeyModifiers::default());
        g.blur();
        assert_eq!(*submitted.borrow(), 0);

        // Dirty session: blur submits
        g.handle_key("x", KeyModifiers::default());
        g.blur();
        assert_eq!(*submitted.borrow(), 1);
    }

    #[test]
    fn test_render_walks_window_and_frozen_bands() {
        let mut g = Grid::new(GridConfig {
            frozen_rows: 1,
            ..config(1000, 10)
        });
        g.resize(400.0, 400.0);
        g.scroll_to(0.0, 220.0);

        let mut rec = Recorder::default();
        let mut overlay = Recorder::default();
        g.render(&mut rec, &mut overlay).unwrap();

        assert_eq!(rec.frames, 1);
        assert!(rec.cells.iter().any(|c| c.is_frozen_row));
        // Frozen row 0 renders at y=0 regardless of scroll
        let frozen = rec.cells.iter().find(|c| c.is_frozen_row).unwrap();
        assert_eq!(frozen.rect.y, 0.0);
        // First scrollable cell is the overscanned row 10, painted at the
        // top edge and covered by the frozen band
        let scrollable = rec
            .cells
            .iter()
            .find(|c| !c.is_frozen_row && c.cell.column_index == 0)
            .unwrap();
        assert_eq!(scrollable.cell.row_index, 10);
        assert_eq!(scrollable.rect.y, 0.0);
    }

    #[test]
    fn test_render_merge_drawn_once_expanded() {
        let mut g = Grid::new(GridConfig {
            merged_cells: vec![AreaBounds::new(0, 0, 1, 1)],
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        let mut rec = Recorder::default();
        let mut overlay = Recorder::default();
        g.render(&mut rec, &mut overlay).unwrap();

        let merged: Vec<_> = rec.cells.iter().filter(|c| c.is_merge_origin).collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].cell, cell(0, 0));
        assert_eq!(merged[0].rect.width, 128.0);
        assert_eq!(merged[0].rect.height, 40.0);
        // Covered cells never draw individually
        assert!(!rec
            .cells
            .iter()
            .any(|c| !c.is_merge_origin && c.cell == cell(0, 1)));
    }

    #[test]
    fn test_render_overlays_mark_current_region() {
        let mut g = grid(100, 10);
        g.select_cell(cell(0, 0));
        g.handle_key(
            "ArrowDown",
            KeyModifiers {
                shift: true,
                ..KeyModifiers::default()
            },
        );

        let mut rec = Recorder::default();
        let mut overlay = Recorder::default();
        g.render(&mut rec, &mut overlay).unwrap();
        assert_eq!(overlay.regions.len(), 1);
        assert!(overlay.regions[0].is_current);
        assert_eq!(overlay.regions[0].bounds, AreaBounds::new(0, 0, 1, 0));
        assert_eq!(overlay.active.len(), 1);
    }

    #[test]
    fn test_alt_page_keys_move_horizontally() {
        let mut g = grid(100, 100);
        g.select_cell(cell(0, 0));
        let alt = KeyModifiers {
            alt: true,
            ..KeyModifiers::default()
        };
        // 64px columns in a 400px container: visible span is 6
        assert!(g.handle_key("PageDown", alt));
        assert_eq!(g.active_cell(), Some(cell(0, 6)));
        assert!(g.handle_key("PageUp", alt));
        assert_eq!(g.active_cell(), Some(cell(0, 0)));
    }

    #[test]
    fn test_wheel_coalesced_by_throttle() {
        let mut g = grid(1000, 10);
        g.handle_wheel(0.0, 100.0, 0.0);
        g.handle_wheel(0.0, 100.0, 40.0); // accumulates
        assert_eq!(g.scroll_state().scroll_y, 100.0);
        // Interval reopens: the held delta applies together with this one
        g.handle_wheel(0.0, 100.0, 90.0);
        assert_eq!(g.scroll_state().scroll_y, 300.0);
    }

    #[test]
    fn test_subscribed_handler_sees_scroll() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut g = grid(1000, 10);
        let id = g.subscribe(move |event, _| {
            if let GridEvent::Scrolled { y, .. } = event {
                sink.borrow_mut().push(*y);
            }
        });
        g.scroll_to(0.0, 100.0);
        g.unsubscribe(id);
        g.scroll_to(0.0, 200.0);
        assert_eq!(*seen.borrow(), vec![100.0]);
    }

    #[test]
    fn test_focus_picks_first_focusable() {
        let mut g = Grid::new(GridConfig {
            is_row_hidden: Some(Box::new(|r| r == 0)),
            ..config(100, 10)
        });
        g.resize(400.0, 400.0);
        g.focus();
        assert_eq!(g.active_cell(), Some(cell(1, 0)));
        // Idempotent
        g.focus();
        assert_eq!(g.active_cell(), Some(cell(1, 0)));
    }
}
