//! Selection regions and related enums.

use serde::{Deserialize, Serialize};

use super::cell::AreaBounds;

/// How many independent selection regions the grid allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Selection is disabled entirely.
    None,
    /// A single region at a time; append requests are ignored.
    #[default]
    Single,
    /// Multiple regions (ctrl/meta-click appends).
    Multiple,
}

/// How a new selection interacts with the existing region list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Replace the whole list with one region.
    Clear,
    /// Extend the last region to cover the new target.
    Modify,
    /// Add a region to the list (policy `Multiple` only).
    Append,
}

/// Keyboard navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Optional per-region appearance overrides, passed through to the
/// selection renderer untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionStyle {
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub stroke_width: Option<f32>,
}

/// One selected region.
///
/// Regions live in an ordered list; the last entry anchors extend/drag
/// gestures. Whether that entry is mid-gesture is the explicit
/// `in_progress` flag, not a positional convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRegion {
    pub bounds: AreaBounds,
    pub in_progress: bool,
    pub style: Option<SelectionStyle>,
}

impl SelectionRegion {
    pub fn new(bounds: AreaBounds) -> Self {
        Self {
            bounds,
            in_progress: false,
            style: None,
        }
    }

    pub fn in_progress(bounds: AreaBounds) -> Self {
        Self {
            bounds,
            in_progress: true,
            style: None,
        }
    }
}
