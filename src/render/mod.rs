//! Drawer traits for pluggable rendering implementations.
//!
//! The engine computes geometry and hands it to these traits; it never
//! paints. Hosts implement them over Canvas 2D, a DOM layer, or a test
//! recorder.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::ViewportBounds;
use crate::types::{AreaBounds, CellCoordinate, CellRect, SelectionStyle};

/// Per-frame parameters handed to the drawer before any cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameParams {
    pub viewport: ViewportBounds,
    pub scale: f32,
    /// Container size in pixels.
    pub width: f32,
    pub height: f32,
}

/// Geometry for a single visible cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDrawParams {
    pub cell: CellCoordinate,
    /// Pixel box in container coordinates, merge-expanded for origins.
    pub rect: CellRect,
    pub is_frozen_row: bool,
    pub is_frozen_column: bool,
    /// Origin of a merged range; `rect` covers the whole range.
    pub is_merge_origin: bool,
}

/// Geometry for one selection region overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDrawParams {
    pub bounds: AreaBounds,
    /// Pixel box in container coordinates, clipped to the container.
    pub rect: CellRect,
    pub in_progress: bool,
    /// Last region in the list; carries the active cell and fill handle.
    pub is_current: bool,
    pub style: Option<SelectionStyle>,
}

/// Receives visible-cell geometry each frame.
///
/// `draw_cell` is called for the scrollable window first, then the frozen
/// bands (frozen rows, frozen columns, corner), so frozen content paints
/// over half-scrolled cells without explicit clipping.
pub trait CellDrawer {
    fn begin_frame(&mut self, _frame: &FrameParams) -> Result<()> {
        Ok(())
    }

    fn draw_cell(&mut self, params: &CellDrawParams) -> Result<()>;

    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receives selection overlay geometry after the cells of a frame.
pub trait SelectionRenderer {
    fn draw_region(&mut self, params: &RegionDrawParams) -> Result<()>;

    /// Border box of the active cell (merge-expanded).
    fn draw_active_cell(&mut self, rect: &CellRect) -> Result<()>;

    /// Outline shown while a region is dragged to a new position.
    fn draw_drag_preview(&mut self, rect: &CellRect) -> Result<()> {
        let _ = rect;
        Ok(())
    }

    /// Outline shown while the fill handle is dragged.
    fn draw_fill_preview(&mut self, rect: &CellRect) -> Result<()> {
        let _ = rect;
        Ok(())
    }
}
