//! Scroll-to-item alignment.
//!
//! Pure offset arithmetic over one axis; the grid applies the result (or
//! defers it a frame when the target is far outside the measured window).

use serde::{Deserialize, Serialize};

use super::axis::AxisLayout;

/// Alignment policy for `scroll_to_item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    /// Item's leading edge at the viewport's leading edge.
    Start,
    /// Item's trailing edge at the viewport's trailing edge.
    End,
    /// Item centered in the viewport.
    Center,
    /// No-op when fully visible, otherwise `Auto`.
    #[default]
    Smart,
    /// `Start` when the item precedes the window, `End` when it follows,
    /// no-op when visible.
    Auto,
}

/// Inputs for one axis of an alignment computation.
#[derive(Debug, Clone, Copy)]
pub struct AlignParams {
    pub index: u32,
    pub count: u32,
    pub frozen_count: u32,
    pub scroll_offset: f32,
    pub container_extent: f32,
}

/// Scroll offset satisfying `align` for the item, or `None` when the axis
/// should not move (frozen band, or already-satisfied smart/auto).
pub fn aligned_offset(
    axis: &mut AxisLayout,
    params: AlignParams,
    align: Align,
    measure: &dyn Fn(u32) -> f32,
) -> Option<f32> {
    let AlignParams {
        index,
        count,
        frozen_count,
        scroll_offset,
        container_extent,
    } = params;

    if index >= count {
        return None;
    }
    // An axis inside the frozen region never scrolls
    if index < frozen_count {
        return None;
    }

    let item_start = axis.offset(index, measure);
    let item_size = axis.measured_size(index, measure);
    let item_end = item_start + item_size;

    let frozen_extent = if frozen_count > 0 {
        axis.offset(frozen_count, measure)
    } else {
        0.0
    };
    // Content at `scroll_offset` renders at the frozen boundary, so the
    // scrollable window covers one frozen extent less than the container.
    let scrollable_extent = (container_extent - frozen_extent).max(0.0);
    let window_start = scroll_offset;
    let window_end = scroll_offset + scrollable_extent;

    let resolved = match align {
        Align::Smart | Align::Auto => {
            if align == Align::Smart && item_start >= window_start && item_end <= window_end {
                return None;
            }
            if item_start < window_start {
                Align::Start
            } else if item_end > window_end {
                Align::End
            } else {
                return None;
            }
        }
        other => other,
    };

    let target = match resolved {
        Align::Start => item_start,
        Align::End => item_end - scrollable_extent,
        Align::Center => item_start - (scrollable_extent - item_size) / 2.0,
        // Smart/Auto already resolved above
        Align::Smart | Align::Auto => return None,
    };

    let max = (axis.estimated_total_size(count) - scrollable_extent).max(frozen_extent);
    Some(target.clamp(frozen_extent, max))
}

/// True when `index` lies more than one viewport beyond the currently
/// rendered window. Such scrolls are deferred one frame so geometry is
/// recomputed before the jump.
pub fn is_far_target(index: u32, window_start: u32, window_stop: u32) -> bool {
    let span = window_stop.saturating_sub(window_start) + 1;
    index > window_stop.saturating_add(span)
        || index.saturating_add(span) < window_start
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
    use test_case::test_case;

    fn uniform(size: f32) -> impl Fn(u32) -> f32 {
        move |_| size
    }

    fn params(index: u32, scroll: f32) -> AlignParams {
        AlignParams {
            index,
            count: 1000,
            frozen_count: 0,
            scroll_offset: scroll,
            container_extent: 400.0,
        }
    }

    #[test_case(Align::Start, 1000.0 ; "start puts leading edge at top")]
    #[test_case(Align::End, 620.0 ; "end puts trailing edge at bottom")]
    #[test_case(Align::Center, 810.0 ; "center splits the difference")]
    fn test_explicit_alignments(align: Align, expected: f32) {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        // Item 50: [1000, 1020] with viewport at 0
        let got = aligned_offset(&mut axis, params(50, 0.0), align, &m).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_smart_is_noop_when_fully_visible() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        // Item 5: [100, 120], window [0, 400]
        assert_eq!(aligned_offset(&mut axis, params(5, 0.0), Align::Smart, &m), None);
    }

    #[test]
    fn test_auto_aligns_toward_the_item() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        // Item precedes the window -> start
        let before = aligned_offset(&mut axis, params(5, 500.0), Align::Auto, &m).unwrap();
        assert_eq!(before, 100.0);
        // Item follows the window -> end
        let after = aligned_offset(&mut axis, params(50, 0.0), Align::Auto, &m).unwrap();
        assert_eq!(after, 620.0);
        // Item inside the window -> no-op
        assert_eq!(aligned_offset(&mut axis, params(10, 100.0), Align::Auto, &m), None);
    }

    #[test]
    fn test_frozen_axis_never_scrolls() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        let p = AlignParams {
            frozen_count: 3,
            ..params(2, 500.0)
        };
        assert_eq!(aligned_offset(&mut axis, p, Align::Start, &m), None);
    }

    #[test]
    fn test_result_clamped_to_scroll_range() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        // Centering item 0 would go negative; clamps to 0
        let got = aligned_offset(&mut axis, params(0, 300.0), Align::Center, &m).unwrap();
        assert_eq!(got, 0.0);
        // Last item: clamp to total - extent
        let got = aligned_offset(&mut axis, params(999, 0.0), Align::End, &m).unwrap();
        assert_eq!(got, 20_000.0 - 400.0);
    }

    #[test]
    fn test_out_of_bounds_index_is_noop() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        assert_eq!(aligned_offset(&mut axis, params(1000, 0.0), Align::Start, &m), None);
    }

    #[test]
    fn test_far_target_detection() {
        // Window [10, 30], span 21
        assert!(!is_far_target(31, 10, 30));
        assert!(!is_far_target(51, 10, 30));
        assert!(is_far_target(52, 10, 30));
        assert!(!is_far_target(0, 10, 30));
        assert!(is_far_target(0, 40, 60));
    }
}
