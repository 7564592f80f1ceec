//! Windowing engine: metadata caches, viewport calculation, scroll alignment.

pub mod axis;
pub mod scroll;
pub mod viewport;

pub use axis::{AxisLayout, ItemMetadata};
pub use scroll::{aligned_offset, is_far_target, Align, AlignParams};
pub use viewport::{overscanned_range, visible_window, ScrollDirection, Viewport, ViewportBounds};
