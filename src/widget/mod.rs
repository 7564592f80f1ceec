//! Browser widget binding the grid engine to a canvas element.
//!
//! The engine stays paint-free: each frame is captured as serializable
//! geometry and handed to a JavaScript render callback, which draws it with
//! Canvas 2D (or anything else). Pointer, wheel, and keyboard listeners are
//! registered on construction; no manual wiring is required beyond the
//! render callback.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use crate::error::Result as GridResult;
use crate::grid::{Grid, GridEvent, KeyModifiers, ScrollState};
use crate::layout::Align;
use crate::render::{CellDrawParams, CellDrawer, FrameParams, RegionDrawParams, SelectionRenderer};
use crate::types::{
    AreaBounds, CellCoordinate, CellRect, Direction, GridConfig, SelectionPolicy,
    DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT, DEFAULT_OVERSCAN,
};

/// JSON-friendly construction options. Size callbacks cannot cross the
/// boundary, so sizing is uniform (plus optional per-index overrides) and
/// hidden indices are explicit lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetOptions {
    pub row_count: u32,
    pub column_count: u32,
    pub row_height: f32,
    pub column_width: f32,
    pub row_height_overrides: Vec<(u32, f32)>,
    pub column_width_overrides: Vec<(u32, f32)>,
    pub hidden_rows: Vec<u32>,
    pub hidden_columns: Vec<u32>,
    pub frozen_rows: u32,
    pub frozen_columns: u32,
    pub overscan_count: u32,
    pub scale: f32,
    pub initial_scroll: (f32, f32),
    pub merged_cells: Vec<AreaBounds>,
    pub multiple_selections: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            row_count: 0,
            column_count: 0,
            row_height: DEFAULT_ROW_HEIGHT,
            column_width: DEFAULT_COL_WIDTH,
            row_height_overrides: Vec::new(),
            column_width_overrides: Vec::new(),
            hidden_rows: Vec::new(),
            hidden_columns: Vec::new(),
            frozen_rows: 0,
            frozen_columns: 0,
            overscan_count: DEFAULT_OVERSCAN,
            scale: 1.0,
            initial_scroll: (0.0, 0.0),
            merged_cells: Vec::new(),
            multiple_selections: false,
        }
    }
}

impl WidgetOptions {
    fn into_config(self) -> GridConfig {
        let base_row = self.row_height;
        let row_overrides = self.row_height_overrides;
        let base_col = self.column_width;
        let col_overrides = self.column_width_overrides;
        let hidden_rows = self.hidden_rows;
        let hidden_columns = self.hidden_columns;

        GridConfig {
            row_count: self.row_count,
            column_count: self.column_count,
            row_height: Box::new(move |i| {
                row_overrides
                    .iter()
                    .find(|(idx, _)| *idx == i)
                    .map_or(base_row, |(_, size)| *size)
            }),
            column_width: Box::new(move |i| {
                col_overrides
                    .iter()
                    .find(|(idx, _)| *idx == i)
                    .map_or(base_col, |(_, size)| *size)
            }),
            estimated_row_height: self.row_height,
            estimated_column_width: self.column_width,
            is_row_hidden: if hidden_rows.is_empty() {
                None
            } else {
                Some(Box::new(move |i| hidden_rows.contains(&i)))
            },
            is_column_hidden: if hidden_columns.is_empty() {
                None
            } else {
                Some(Box::new(move |i| hidden_columns.contains(&i)))
            },
            frozen_rows: self.frozen_rows,
            frozen_columns: self.frozen_columns,
            overscan_count: self.overscan_count,
            scale: self.scale,
            initial_scroll: self.initial_scroll,
            merged_cells: self.merged_cells,
            selection_policy: if self.multiple_selections {
                SelectionPolicy::Multiple
            } else {
                SelectionPolicy::Single
            },
            ..GridConfig::default()
        }
    }
}

/// Edit-session snapshot crossing the boundary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditSnapshot {
    cell: CellCoordinate,
    rect: CellRect,
    max_width: f32,
    max_height: f32,
    is_dirty: bool,
    value: String,
}

/// One frame of geometry handed to the JS render callback.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameCapture {
    frame: Option<FrameParams>,
    cells: Vec<CellDrawParams>,
    regions: Vec<RegionDrawParams>,
    active_cell: Option<CellRect>,
    drag_preview: Option<CellRect>,
    fill_preview: Option<CellRect>,
}

impl CellDrawer for FrameCapture {
    fn begin_frame(&mut self, frame: &FrameParams) -> GridResult<()> {
        self.frame = Some(frame.clone());
        Ok(())
    }

    fn draw_cell(&mut self, params: &CellDrawParams) -> GridResult<()> {
        self.cells.push(params.clone());
        Ok(())
    }
}

impl SelectionRenderer for FrameCapture {
    fn draw_region(&mut self, params: &RegionDrawParams) -> GridResult<()> {
        self.regions.push(params.clone());
        Ok(())
    }

    fn draw_active_cell(&mut self, rect: &CellRect) -> GridResult<()> {
        self.active_cell = Some(*rect);
        Ok(())
    }

    fn draw_drag_preview(&mut self, rect: &CellRect) -> GridResult<()> {
        self.drag_preview = Some(*rect);
        Ok(())
    }

    fn draw_fill_preview(&mut self, rect: &CellRect) -> GridResult<()> {
        self.fill_preview = Some(*rect);
        Ok(())
    }
}

struct SharedState {
    grid: Grid,
    render_callback: Option<Function>,
}

impl SharedState {
    fn request_render(state: &Rc<RefCell<Self>>) {
        let callback = state.borrow().render_callback.clone();
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

fn modifiers(shift: bool, ctrl: bool, meta: bool, alt: bool) -> KeyModifiers {
    KeyModifiers {
        shift,
        ctrl,
        meta,
        alt,
    }
}

/// Canvas-bound grid widget exported to JavaScript.
#[wasm_bindgen]
pub struct GridWidget {
    state: Rc<RefCell<SharedState>>,
    // Listeners stay registered for the widget's lifetime
    _mouse_down: Closure<dyn FnMut(MouseEvent)>,
    _mouse_move: Closure<dyn FnMut(MouseEvent)>,
    _mouse_up: Closure<dyn FnMut(MouseEvent)>,
    _wheel: Closure<dyn FnMut(WheelEvent)>,
    _key_down: Closure<dyn FnMut(KeyboardEvent)>,
}

#[wasm_bindgen]
impl GridWidget {
    /// Create a widget over `canvas` from a JSON options object (see
    /// [`WidgetOptions`] for the accepted fields).
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: &HtmlCanvasElement, options_json: &str) -> Result<GridWidget, JsValue> {
        console_error_panic_hook::set_once();

        let options: WidgetOptions = serde_json::from_str(options_json).map_err(js_err)?;
        let mut grid = Grid::new(options.into_config());
        #[allow(clippy::cast_possible_truncation)]
        grid.resize(
            canvas.client_width() as f32,
            canvas.client_height() as f32,
        );

        let state = Rc::new(RefCell::new(SharedState {
            grid,
            render_callback: None,
        }));

        let mouse_down = {
            let state = Rc::clone(&state);
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                {
                    let mut s = state.borrow_mut();
                    #[allow(clippy::cast_possible_truncation)]
                    let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
                    s.grid.pointer_down(
                        x,
                        y,
                        modifiers(
                            event.shift_key(),
                            event.ctrl_key(),
                            event.meta_key(),
                            event.alt_key(),
                        ),
                    );
                }
                SharedState::request_render(&state);
            })
        };
        canvas
            .add_event_listener_with_callback("mousedown", mouse_down.as_ref().unchecked_ref())?;

        let mouse_move = {
            let state = Rc::clone(&state);
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let moved = {
                    let mut s = state.borrow_mut();
                    if s.grid.selection().drag().is_none() {
                        false
                    } else {
                        #[allow(clippy::cast_possible_truncation)]
                        let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
                        s.grid.pointer_move(x, y);
                        true
                    }
                };
                if moved {
                    SharedState::request_render(&state);
                }
            })
        };
        canvas
            .add_event_listener_with_callback("mousemove", mouse_move.as_ref().unchecked_ref())?;

        let mouse_up = {
            let state = Rc::clone(&state);
            Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
                state.borrow_mut().grid.pointer_up();
                SharedState::request_render(&state);
            })
        };
        canvas.add_event_listener_with_callback("mouseup", mouse_up.as_ref().unchecked_ref())?;

        let wheel = {
            let state = Rc::clone(&state);
            Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
                event.prevent_default();
                {
                    let mut s = state.borrow_mut();
                    #[allow(clippy::cast_possible_truncation)]
                    let (dx, dy) = (event.delta_x() as f32, event.delta_y() as f32);
                    s.grid.handle_wheel(dx, dy, now_ms());
                }
                SharedState::request_render(&state);
            })
        };
        canvas.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;

        let key_down = {
            let state = Rc::clone(&state);
            Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let consumed = state.borrow_mut().grid.handle_key(
                    &event.key(),
                    modifiers(
                        event.shift_key(),
                        event.ctrl_key(),
                        event.meta_key(),
                        event.alt_key(),
                    ),
                );
                if consumed {
                    event.prevent_default();
                    SharedState::request_render(&state);
                }
            })
        };
        canvas.add_event_listener_with_callback("keydown", key_down.as_ref().unchecked_ref())?;

        Ok(GridWidget {
            state,
            _mouse_down: mouse_down,
            _mouse_move: mouse_move,
            _mouse_up: mouse_up,
            _wheel: wheel,
            _key_down: key_down,
        })
    }

    /// Register the JS function invoked whenever the widget needs a redraw.
    pub fn set_render_callback(&self, callback: Function) {
        self.state.borrow_mut().render_callback = Some(callback);
    }

    /// Capture the current frame's geometry as a JS object:
    /// `{ frame, cells, regions, activeCell, dragPreview, fillPreview }`.
    pub fn render(&self) -> Result<JsValue, JsValue> {
        let mut capture = FrameCapture::default();
        {
            let mut s = self.state.borrow_mut();
            // One drawer instance serves both roles, so split via locals
            let mut overlay = FrameCapture::default();
            s.grid.render(&mut capture, &mut overlay).map_err(js_err)?;
            capture.regions = overlay.regions;
            capture.active_cell = overlay.active_cell;
            capture.drag_preview = overlay.drag_preview;
            capture.fill_preview = overlay.fill_preview;
        }
        serde_wasm_bindgen::to_value(&capture).map_err(js_err)
    }

    /// Per-frame tick (call from `requestAnimationFrame`). Returns true
    /// when a redraw is needed.
    pub fn on_frame(&self, now: f64) -> bool {
        self.state.borrow_mut().grid.on_frame(now)
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.state.borrow_mut().grid.resize(width, height);
    }

    pub fn set_scale(&self, scale: f32) {
        self.state.borrow_mut().grid.set_scale(scale);
    }

    pub fn scroll_to(&self, x: f32, y: f32) {
        self.state.borrow_mut().grid.scroll_to(x, y);
    }

    pub fn scroll_by(&self, dx: f32, dy: f32) {
        self.state.borrow_mut().grid.scroll_by(dx, dy);
    }

    /// Host scrollbar event; suspends hit testing until scrolling settles.
    pub fn on_scroll_event(&self, x: f32, y: f32) {
        self.state.borrow_mut().grid.on_scroll_event(x, y, now_ms());
    }

    /// Scroll a cell into view. `align` is one of `start`, `end`,
    /// `center`, `smart`, `auto` (default `smart`).
    pub fn scroll_to_item(&self, row: u32, col: u32, align: &str) {
        let align = match align {
            "start" => Align::Start,
            "end" => Align::End,
            "center" => Align::Center,
            "auto" => Align::Auto,
            _ => Align::Smart,
        };
        self.state
            .borrow_mut()
            .grid
            .scroll_to_item(CellCoordinate::new(row, col), align);
    }

    pub fn get_viewport(&self) -> Result<JsValue, JsValue> {
        let bounds = self.state.borrow().grid.get_viewport();
        serde_wasm_bindgen::to_value(&bounds).map_err(js_err)
    }

    pub fn get_scroll_state(&self) -> Result<JsValue, JsValue> {
        let scroll = self.state.borrow().grid.scroll_state();
        serde_wasm_bindgen::to_value(&scroll).map_err(js_err)
    }

    pub fn set_scroll_state(&self, value: JsValue) -> Result<(), JsValue> {
        let scroll: ScrollState = serde_wasm_bindgen::from_value(value).map_err(js_err)?;
        self.state.borrow_mut().grid.set_scroll_state(scroll);
        Ok(())
    }

    /// Hit test a canvas pixel position; `null` while scrolling or on a
    /// miss.
    pub fn get_cell_at(&self, x: f32, y: f32, include_frozen: bool) -> Result<JsValue, JsValue> {
        let cell = self
            .state
            .borrow_mut()
            .grid
            .get_cell_coords_from_offset(x, y, include_frozen);
        serde_wasm_bindgen::to_value(&cell).map_err(js_err)
    }

    /// Merge-expanded index-space bounds of a cell; `null` out of range.
    pub fn get_cell_bounds(&self, row: u32, col: u32) -> Result<JsValue, JsValue> {
        let bounds = self
            .state
            .borrow()
            .grid
            .get_cell_bounds(CellCoordinate::new(row, col));
        serde_wasm_bindgen::to_value(&bounds).map_err(js_err)
    }

    pub fn get_active_cell(&self) -> Result<JsValue, JsValue> {
        let cell = self.state.borrow().grid.active_cell();
        serde_wasm_bindgen::to_value(&cell).map_err(js_err)
    }

    pub fn select_cell(&self, row: u32, col: u32) {
        self.state
            .borrow_mut()
            .grid
            .select_cell(CellCoordinate::new(row, col));
    }

    pub fn select_all(&self) {
        self.state.borrow_mut().grid.select_all();
    }

    pub fn resize_rows(&self, indices: Vec<u32>) {
        self.state.borrow_mut().grid.resize_rows(&indices);
    }

    pub fn resize_columns(&self, indices: Vec<u32>) {
        self.state.borrow_mut().grid.resize_columns(&indices);
    }

    /// Open an edit session over a cell.
    pub fn make_editable(&self, row: u32, col: u32, initial_value: Option<String>) {
        let has_initial = initial_value.is_some();
        self.state.borrow_mut().grid.make_editable(
            CellCoordinate::new(row, col),
            initial_value,
            true,
            has_initial,
        );
    }

    /// Push the edit input's live value into the session.
    pub fn set_edit_value(&self, value: &str) {
        self.state.borrow_mut().grid.set_edit_value(value);
    }

    /// Submit the open edit session. `move_direction` is one of `up`,
    /// `down`, `left`, `right`; omit it to submit in place.
    pub fn submit_edit(&self, move_direction: Option<String>) {
        let direction = move_direction.as_deref().and_then(|d| match d {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        });
        self.state.borrow_mut().grid.submit_edit(direction);
    }

    pub fn cancel_edit(&self) {
        self.state.borrow_mut().grid.cancel_edit();
    }

    /// Snapshot of the open edit session, or `null`.
    pub fn get_edit_session(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        let snapshot = state.grid.edit_session().map(|s| EditSnapshot {
            cell: s.cell,
            rect: s.rect,
            max_width: s.max_width,
            max_height: s.max_height,
            is_dirty: s.is_dirty,
            value: s.value.clone(),
        });
        serde_wasm_bindgen::to_value(&snapshot).map_err(js_err)
    }

    pub fn focus(&self) {
        self.state.borrow_mut().grid.focus();
    }

    pub fn blur(&self) {
        self.state.borrow_mut().grid.blur();
    }
}

impl GridWidget {
    /// Subscribe a Rust-side handler to grid events (non-exported; the JS
    /// surface consumes the render callback instead).
    pub fn subscribe(&self, handler: impl FnMut(&GridEvent, &mut crate::events::Propagation) + 'static) {
        self.state.borrow_mut().grid.subscribe(handler);
    }
}
