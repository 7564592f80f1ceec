//! Per-axis metadata cache and offset resolver.
//!
//! Sizes come from arbitrary host callbacks with no closed form, so offsets
//! are resolved by lazy accumulation: the cache holds a measured prefix and
//! everything past the measurement frontier is estimated. Resolving an
//! unmeasured index is deliberately O(distance) and caches every
//! intermediate entry on the way.

/// Measured geometry of one row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemMetadata {
    /// Pixel offset of the item's leading edge (unscaled).
    pub offset: f32,
    /// Measured size (unscaled).
    pub size: f32,
}

/// Metadata cache for one axis (rows or columns).
///
/// `items` is the measured prefix: `items.len() - 1` is the last measured
/// index, and indices beyond it report `estimated_size` until resolved.
/// The `scale` factor multiplies every returned size and offset uniformly;
/// cached values stay unscaled so zoom changes never invalidate the cache.
pub struct AxisLayout {
    items: Vec<ItemMetadata>,
    estimated_size: f32,
    scale: f32,
}

impl AxisLayout {
    pub fn new(estimated_size: f32) -> Self {
        Self {
            items: Vec::new(),
            estimated_size,
            scale: 1.0,
        }
    }

    /// Highest index with a real measurement, if any.
    pub fn last_measured(&self) -> Option<u32> {
        let len = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        len.checked_sub(1)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        debug_assert!(scale.is_finite() && scale > 0.0);
        self.scale = scale;
    }

    /// Extend the measured prefix through `index`.
    fn measure_through(&mut self, index: u32, measure: &dyn Fn(u32) -> f32) {
        let target = index as usize;
        while self.items.len() <= target {
            let next = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
            let offset = self
                .items
                .last()
                .map(|m| m.offset + m.size)
                .unwrap_or(0.0);
            self.items.push(ItemMetadata {
                offset,
                size: measure(next),
            });
        }
    }

    /// Size of `index`: the cached measurement if available, else the
    /// estimate. Never triggers measurement.
    pub fn size(&self, index: u32) -> f32 {
        self.items
            .get(index as usize)
            .map(|m| m.size)
            .unwrap_or(self.estimated_size)
            * self.scale
    }

    /// Offset of `index`'s leading edge, measuring forward from the
    /// frontier as needed.
    pub fn offset(&mut self, index: u32, measure: &dyn Fn(u32) -> f32) -> f32 {
        self.measure_through(index, measure);
        self.items
            .get(index as usize)
            .map(|m| m.offset)
            .unwrap_or(0.0)
            * self.scale
    }

    /// Measured size of `index`, resolving it first.
    pub fn measured_size(&mut self, index: u32, measure: &dyn Fn(u32) -> f32) -> f32 {
        self.measure_through(index, measure);
        self.size(index)
    }

    /// Drop cached metadata from `index` onward. The next query re-measures;
    /// nothing is recomputed eagerly.
    pub fn invalidate(&mut self, index: u32) {
        self.items.truncate(index as usize);
    }

    /// Total axis extent for `count` items: exact measured prefix plus
    /// estimated suffix, so the total changes smoothly as measurement
    /// progresses.
    pub fn estimated_total_size(&self, count: u32) -> f32 {
        let measured = u32::try_from(self.items.len().min(count as usize)).unwrap_or(count);
        let prefix = self
            .items
            .get(..measured as usize)
            .and_then(|s| s.last())
            .map(|m| m.offset + m.size)
            .unwrap_or(0.0);
        let remaining = count.saturating_sub(measured) as f32;
        (prefix + remaining * self.estimated_size) * self.scale
    }

    /// Greatest index whose offset is <= `offset` (scaled pixels).
    ///
    /// Binary search over the measured prefix; beyond it, measurement is
    /// extended lazily until the target offset is covered or the axis ends.
    pub fn index_at_offset(
        &mut self,
        offset: f32,
        count: u32,
        measure: &dyn Fn(u32) -> f32,
    ) -> Option<u32> {
        if count == 0 {
            return None;
        }
        debug_assert!(offset.is_finite());
        let last = count - 1;
        let target = (offset / self.scale).max(0.0);

        let frontier_end = self
            .items
            .last()
            .map(|m| m.offset + m.size)
            .unwrap_or(0.0);

        if target >= frontier_end {
            // Walk forward, measuring, until the item under `target` exists.
            let mut index = u32::try_from(self.items.len()).unwrap_or(last).min(last);
            loop {
                self.measure_through(index, measure);
                let end = self
                    .items
                    .get(index as usize)
                    .map(|m| m.offset + m.size)
                    .unwrap_or(f32::MAX);
                if end > target || index == last {
                    return Some(index);
                }
                index += 1;
            }
        }

        let searched = self.items.partition_point(|m| m.offset <= target);
        let found = u32::try_from(searched.saturating_sub(1)).unwrap_or(0);
        Some(found.min(last))
    }

    /// Minimal contiguous window `[start, stop]` whose pixel extent covers
    /// `[scroll_offset, scroll_offset + extent]`.
    pub fn visible_range(
        &mut self,
        scroll_offset: f32,
        extent: f32,
        count: u32,
        measure: &dyn Fn(u32) -> f32,
    ) -> Option<(u32, u32)> {
        let start = self.index_at_offset(scroll_offset, count, measure)?;
        let last = count - 1;
        let limit = scroll_offset + extent.max(0.0);

        let mut stop = start;
        while stop < last {
            let end = self.offset(stop, measure) + self.measured_size(stop, measure);
            if end >= limit {
                break;
            }
            stop += 1;
        }
        Some((start, stop))
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

    fn uniform(size: f32) -> impl Fn(u32) -> f32 {
        move |_| size
    }

    #[test]
    fn test_offset_monotonicity() {
        let mut axis = AxisLayout::new(10.0);
        let measure = |i: u32| 5.0 + (i % 3) as f32;
        for i in 0..100 {
            let a = axis.offset(i, &measure);
            let b = axis.offset(i + 1, &measure);
            assert_eq!(b, a + axis.size(i));
        }
    }

    #[test]
    fn test_size_estimate_before_measurement() {
        let mut axis = AxisLayout::new(25.0);
        assert_eq!(axis.size(7), 25.0);
        // Resolving index 3 measures 0..=3 but nothing beyond
        axis.offset(3, &uniform(10.0));
        assert_eq!(axis.last_measured(), Some(3));
        assert_eq!(axis.size(3), 10.0);
        assert_eq!(axis.size(4), 25.0);
    }

    #[test]
    fn test_estimation_convergence() {
        let measure = |i: u32| 4.0 + (i % 5) as f32;
        let count = 50u32;
        let mut axis = AxisLayout::new(100.0);

        // Fully measured: estimate equals the exact sum
        axis.offset(count - 1, &measure);
        let exact: f32 = (0..count).map(measure).sum();
        assert_eq!(axis.estimated_total_size(count), exact);
    }

    #[test]
    fn test_estimated_total_mixes_prefix_and_suffix() {
        let mut axis = AxisLayout::new(30.0);
        axis.offset(9, &uniform(20.0)); // 10 measured at 20 each
        assert_eq!(axis.estimated_total_size(100), 200.0 + 90.0 * 30.0);
    }

    #[test]
    fn test_invalidate_pulls_frontier_back() {
        let mut axis = AxisLayout::new(10.0);
        axis.offset(20, &uniform(10.0));
        assert_eq!(axis.last_measured(), Some(20));

        axis.invalidate(5);
        assert_eq!(axis.last_measured(), Some(4));

        // Re-measure with a new size; offsets past the cut reflect it
        assert_eq!(axis.offset(5, &uniform(40.0)), 50.0);
        assert_eq!(axis.offset(6, &uniform(40.0)), 90.0);
    }

    #[test]
    fn test_invalidate_zero_clears_everything() {
        let mut axis = AxisLayout::new(10.0);
        axis.offset(5, &uniform(10.0));
        axis.invalidate(0);
        assert_eq!(axis.last_measured(), None);
        assert_eq!(axis.estimated_total_size(10), 100.0);
    }

    #[test]
    fn test_scale_multiplies_uniformly() {
        let mut axis = AxisLayout::new(10.0);
        let m = uniform(20.0);
        axis.offset(10, &m);
        axis.set_scale(2.0);
        assert_eq!(axis.offset(10, &m), 400.0);
        assert_eq!(axis.size(10), 40.0);
        assert_eq!(axis.estimated_total_size(11), 440.0);
        // Cached values stay unscaled: resetting the scale restores results
        axis.set_scale(1.0);
        assert_eq!(axis.offset(10, &m), 200.0);
    }

    #[test]
    fn test_index_at_offset_measured_region() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        axis.offset(50, &m);
        assert_eq!(axis.index_at_offset(0.0, 1000, &m), Some(0));
        assert_eq!(axis.index_at_offset(205.0, 1000, &m), Some(10));
        assert_eq!(axis.index_at_offset(200.0, 1000, &m), Some(10));
        assert_eq!(axis.index_at_offset(199.9, 1000, &m), Some(9));
    }

    #[test]
    fn test_index_at_offset_extends_measurement() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        assert_eq!(axis.index_at_offset(205.0, 1000, &m), Some(10));
        assert_eq!(axis.last_measured(), Some(10));
    }

    #[test]
    fn test_index_at_offset_clamps_to_last() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        assert_eq!(axis.index_at_offset(1e9, 10, &m), Some(9));
        assert_eq!(axis.index_at_offset(5.0, 0, &m), None);
    }

    #[test]
    fn test_visible_range_covers_extent() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        let (start, stop) = axis.visible_range(205.0, 400.0, 1000, &m).unwrap();
        assert_eq!(start, 10);
        // Window must cover [205, 605]
        assert!(axis.offset(start, &m) <= 205.0);
        assert!(axis.offset(stop, &m) + axis.size(stop) >= 605.0);
        assert_eq!(stop, 30);
    }

    #[test]
    fn test_visible_range_clamps_at_end() {
        let mut axis = AxisLayout::new(20.0);
        let m = uniform(20.0);
        let (start, stop) = axis.visible_range(180.0, 400.0, 10, &m).unwrap();
        assert_eq!(start, 9);
        assert_eq!(stop, 9);
    }
}
