//! Shared helpers for integration tests.
#![allow(dead_code)]

use gridview::error::Result;
use gridview::render::{
    CellDrawParams, CellDrawer, FrameParams, RegionDrawParams, SelectionRenderer,
};
use gridview::{CellRect, Grid, GridConfig, SelectionPolicy};

/// Grid over a uniform matrix (20px rows, 64px columns) in a 400x400
/// container with multi-region selection enabled.
pub fn uniform_grid(rows: u32, cols: u32) -> Grid {
    let mut grid = Grid::new(GridConfig {
        row_count: rows,
        column_count: cols,
        selection_policy: SelectionPolicy::Multiple,
        ..GridConfig::default()
    });
    grid.resize(400.0, 400.0);
    grid
}

pub fn grid_with(config: GridConfig) -> Grid {
    let mut grid = Grid::new(config);
    grid.resize(400.0, 400.0);
    grid
}

/// Drawer double that records every call.
#[derive(Default)]
pub struct Recorder {
    pub frames: Vec<FrameParams>,
    pub cells: Vec<CellDrawParams>,
    pub regions: Vec<RegionDrawParams>,
    pub active: Vec<CellRect>,
    pub drag_previews: Vec<CellRect>,
    pub fill_previews: Vec<CellRect>,
    pub ended: u32,
}

impl CellDrawer for Recorder {
    fn begin_frame(&mut self, frame: &FrameParams) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn draw_cell(&mut self, params: &CellDrawParams) -> Result<()> {
        self.cells.push(params.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.ended += 1;
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

    fn draw_drag_preview(&mut self, rect: &CellRect) -> Result<()> {
        self.drag_previews.push(*rect);
        Ok(())
    }

    fn draw_fill_preview(&mut self, rect: &CellRect) -> Result<()> {
        self.fill_previews.push(*rect);
        Ok(())
    }
}

/// Render into fresh recorders, returning them.
pub fn render(grid: &mut Grid) -> (Recorder, Recorder) {
    let mut cells = Recorder::default();
    let mut overlay = Recorder::default();
    grid.render(&mut cells, &mut overlay)
        .unwrap_or_else(|e| panic!("render failed: {e}"));
    (cells, overlay)
}
