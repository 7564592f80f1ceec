//! Core data model: coordinates, bounds, selection regions, configuration.

pub mod cell;
pub mod config;
pub mod selection;

pub use cell::{AreaBounds, CellCoordinate, CellRect};
pub use config::{
    DeleteFn, FillFn, GridCallbacks, GridConfig, HiddenFn, MoveFn, SelectionEndFn, SizeFn,
    SubmitFn, DEFAULT_COL_WIDTH, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT,
};
pub use selection::{Direction, SelectionMode, SelectionPolicy, SelectionRegion, SelectionStyle};
