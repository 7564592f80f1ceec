//! gridview - virtualized data-grid engine for canvas hosts
//!
//! Windows, selects, and edits over huge cell matrices without touching a
//! paint API:
//! - Lazy per-axis metadata caches with O(distance) offset resolution
//! - Asymmetric overscan windows, frozen bands, merged cells
//! - Multi-region selection with drag-move and fill-handle gestures
//! - Single-session in-place editing with keystroke activation
//! - Geometry-only render walk over pluggable drawer traits
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridWidget } from 'gridview';
//! await init();
//! const grid = new GridWidget(canvas, JSON.stringify({ rowCount: 100000, columnCount: 50 }));
//! grid.set_render_callback(() => draw(grid.render()));
//! ```

// Engine modules (native-testable)
pub mod editor;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod render;
pub mod selection;
pub mod types;

// Browser widget (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub mod widget;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use grid::{Grid, GridEvent, KeyModifiers, ScrollState};
pub use layout::{Align, ViewportBounds};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use widget::GridWidget;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
