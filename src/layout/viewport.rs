//! Viewport state and visible-window calculation.
//!
//! Scroll offsets live in content coordinates that include the frozen
//! extent; the frozen boundary is the scroll minimum, and frozen bands are
//! excluded from window computation (they always render over
//! `[0, frozen_count - 1]`).

use serde::{Deserialize, Serialize};

use super::axis::AxisLayout;

/// Direction of the most recent scroll movement along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Toward higher indices (down / right).
    #[default]
    Forward,
    /// Toward index 0 (up / left).
    Backward,
}

/// Visible area of the grid.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates.
    pub scroll_x: f32,
    /// Vertical scroll position in content coordinates.
    pub scroll_y: f32,
    /// Container width in pixels.
    pub width: f32,
    /// Container height in pixels.
    pub height: f32,
    /// Direction of the last vertical scroll.
    pub vertical_direction: ScrollDirection,
    /// Direction of the last horizontal scroll.
    pub horizontal_direction: ScrollDirection,
    /// True between a scroll event and its settle debounce. Hit testing is
    /// suspended while set.
    pub is_scrolling: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
            vertical_direction: ScrollDirection::Forward,
            horizontal_direction: ScrollDirection::Forward,
            is_scrolling: false,
        }
    }

    /// Resize the container.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Apply a scroll delta, recording direction per axis. Clamping is the
    /// caller's job (it needs axis totals).
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) {
        if delta_x < 0.0 {
            self.horizontal_direction = ScrollDirection::Backward;
        } else if delta_x > 0.0 {
            self.horizontal_direction = ScrollDirection::Forward;
        }
        if delta_y < 0.0 {
            self.vertical_direction = ScrollDirection::Backward;
        } else if delta_y > 0.0 {
            self.vertical_direction = ScrollDirection::Forward;
        }
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
    }

    /// Clamp scroll offsets to `[frozen extent, total - viewport]` per axis.
    pub fn clamp_scroll(&mut self, total_w: f32, total_h: f32, frozen_w: f32, frozen_h: f32) {
        let max_x = frozen_w + ((total_w - frozen_w) - (self.width - frozen_w)).max(0.0);
        let max_y = frozen_h + ((total_h - frozen_h) - (self.height - frozen_h)).max(0.0);
        self.scroll_x = self.scroll_x.clamp(frozen_w, max_x);
        self.scroll_y = self.scroll_y.clamp(frozen_h, max_y);
    }
}

/// Index window snapshot returned by `Grid::get_viewport`.
///
/// `*_start_index..=*_stop_index` is the rendered window (overscan
/// included); the `visible_*` fields are the strictly visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub row_start_index: u32,
    pub row_stop_index: u32,
    pub column_start_index: u32,
    pub column_stop_index: u32,
    pub visible_row_start_index: u32,
    pub visible_row_stop_index: u32,
    pub visible_column_start_index: u32,
    pub visible_column_stop_index: u32,
}

/// Widen a visible window asymmetrically by `overscan`.
///
/// The leading edge (current scroll direction) gets the full overscan; the
/// trailing edge gets 1, preserving tab/focus continuity while bounding
/// redraw cost during fast scrolls. Clamped to `[0, count - 1]`.
pub fn overscanned_range(
    visible: (u32, u32),
    count: u32,
    overscan: u32,
    direction: ScrollDirection,
) -> (u32, u32) {
    if count == 0 {
        return (0, 0);
    }
    let (start, stop) = visible;
    let last = count - 1;
    let (lead_start, lead_stop) = match direction {
        ScrollDirection::Forward => (1, overscan.max(1)),
        ScrollDirection::Backward => (overscan.max(1), 1),
    };
    (
        start.saturating_sub(lead_start),
        stop.saturating_add(lead_stop).min(last),
    )
}

/// Compute the visible scrollable window along one axis, excluding the
/// frozen band's share of the container extent.
pub fn visible_window(
    axis: &mut AxisLayout,
    scroll_offset: f32,
    container_extent: f32,
    count: u32,
    frozen_count: u32,
    measure: &dyn Fn(u32) -> f32,
) -> Option<(u32, u32)> {
    let fc = frozen_count.min(count);
    let frozen_extent = if fc == 0 {
        0.0
    } else if fc == count {
        // Every item frozen: the band spans the whole axis
        axis.estimated_total_size(count)
    } else {
        axis.offset(fc, measure)
    };
    let scrollable_extent = (container_extent - frozen_extent).max(0.0);
    axis.visible_range(scroll_offset, scrollable_extent, count, measure)
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

    fn uniform(size: f32) -> impl Fn(u32) -> f32 {
        move |_| size
    }

    #[test]
    fn test_scenario_uniform_grid_window() {
        // 1000 rows at 20px, container 400, scrollTop 205, overscan 1
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        let visible = visible_window(&mut axis, 205.0, 400.0, 1000, 0, &m).unwrap();
        assert_eq!(visible.0, 10);

        let (start, stop) =
            overscanned_range(visible, 1000, 1, ScrollDirection::Forward);
        assert_eq!(start, 9);
        assert_eq!(stop, visible.1 + 1);
    }

    #[test]
    fn test_overscan_orientation_flips_with_direction() {
        let visible = (50, 60);
        let fwd = overscanned_range(visible, 1000, 5, ScrollDirection::Forward);
        let back = overscanned_range(visible, 1000, 5, ScrollDirection::Backward);
        assert_eq!(fwd, (49, 65));
        assert_eq!(back, (45, 61));
    }

    #[test]
    fn test_overscan_clamps_to_bounds() {
        let r = overscanned_range((0, 9), 10, 4, ScrollDirection::Backward);
        assert_eq!(r, (0, 9));
    }

    #[test]
    fn test_frozen_band_shrinks_window_extent() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        // 2 frozen rows take 40px off the container
        let (start, stop) = visible_window(&mut axis, 40.0, 400.0, 1000, 2, &m).unwrap();
        assert_eq!(start, 2);
        // Covers [40, 400]: rows 2..=19
        assert_eq!(stop, 19);
    }

    #[test]
    fn test_all_frozen_leaves_no_scrollable_extent() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        // 10 items all frozen: the 200px band exceeds the 190px container,
        // so the scrollable share is zero and the window stays minimal
        let (start, stop) = visible_window(&mut axis, 79.0, 190.0, 10, 10, &m).unwrap();
        assert_eq!((start, stop), (3, 3));
    }

    #[test]
    fn test_clamp_scroll_limits() {
        let mut vp = Viewport::new();
        vp.resize(400.0, 400.0);
        vp.scroll_by(10_000.0, 10_000.0);
        vp.clamp_scroll(2000.0, 1000.0, 0.0, 0.0);
        assert_eq!(vp.scroll_x, 1600.0);
        assert_eq!(vp.scroll_y, 600.0);

        vp.scroll_by(-99_999.0, -99_999.0);
        vp.clamp_scroll(2000.0, 1000.0, 40.0, 60.0);
        assert_eq!(vp.scroll_x, 40.0);
        assert_eq!(vp.scroll_y, 60.0);
        assert_eq!(vp.vertical_direction, ScrollDirection::Backward);
        assert_eq!(vp.horizontal_direction, ScrollDirection::Backward);
    }
}
