//! Cell coordinates and rectangular index-space regions.

use serde::{Deserialize, Serialize};

/// Identifies one cell by zero-based row and column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row_index: u32,
    pub column_index: u32,
}

impl CellCoordinate {
    pub fn new(row_index: u32, column_index: u32) -> Self {
        Self {
            row_index,
            column_index,
        }
    }
}

/// Inclusive rectangular region in index space.
///
/// Always normalized: `top <= bottom` and `left <= right`, regardless of the
/// drag direction that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBounds {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl AreaBounds {
    /// Create bounds from two opposite corners, normalizing the edges.
    pub fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self {
            top: top.min(bottom),
            left: left.min(right),
            bottom: top.max(bottom),
            right: left.max(right),
        }
    }

    /// Bounds covering exactly one cell.
    pub fn single(cell: CellCoordinate) -> Self {
        Self {
            top: cell.row_index,
            left: cell.column_index,
            bottom: cell.row_index,
            right: cell.column_index,
        }
    }

    /// Bounds spanning the rectangle between two cells (any corner order).
    pub fn between(a: CellCoordinate, b: CellCoordinate) -> Self {
        Self::new(a.row_index, a.column_index, b.row_index, b.column_index)
    }

    /// Top-left corner cell.
    pub fn top_left(&self) -> CellCoordinate {
        CellCoordinate::new(self.top, self.left)
    }

    /// Bottom-right corner cell.
    pub fn bottom_right(&self) -> CellCoordinate {
        CellCoordinate::new(self.bottom, self.right)
    }

    /// Number of rows covered.
    pub fn row_count(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Number of columns covered.
    pub fn column_count(&self) -> u32 {
        self.right - self.left + 1
    }

    /// True when this region covers exactly one cell.
    pub fn is_single_cell(&self) -> bool {
        self.top == self.bottom && self.left == self.right
    }

    pub fn contains(&self, cell: CellCoordinate) -> bool {
        cell.row_index >= self.top
            && cell.row_index <= self.bottom
            && cell.column_index >= self.left
            && cell.column_index <= self.right
    }

    pub fn intersects(&self, other: &AreaBounds) -> bool {
        self.top <= other.bottom
            && self.bottom >= other.top
            && self.left <= other.right
            && self.right >= other.left
    }

    /// True when every cell of `self` lies inside `other`.
    pub fn is_subset_of(&self, other: &AreaBounds) -> bool {
        self.top >= other.top
            && self.bottom <= other.bottom
            && self.left >= other.left
            && self.right <= other.right
    }

    /// Smallest bounds covering both regions.
    pub fn union(&self, other: &AreaBounds) -> AreaBounds {
        AreaBounds {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    /// Translate by a signed cell delta, clamped so the region keeps its size
    /// and stays inside `limit`. The region is moved, never resized.
    pub fn translated_within(&self, delta_rows: i64, delta_cols: i64, limit: &AreaBounds) -> Self {
        let height = i64::from(self.bottom - self.top);
        let width = i64::from(self.right - self.left);

        let min_top = i64::from(limit.top);
        let max_top = i64::from(limit.bottom) - height;
        let min_left = i64::from(limit.left);
        let max_left = i64::from(limit.right) - width;

        let top = (i64::from(self.top) + delta_rows).clamp(min_top, max_top.max(min_top));
        let left = (i64::from(self.left) + delta_cols).clamp(min_left, max_left.max(min_left));

        let top = u32::try_from(top).unwrap_or(limit.top);
        let left = u32::try_from(left).unwrap_or(limit.left);
        AreaBounds {
            top,
            left,
            bottom: top + u32::try_from(height).unwrap_or(0),
            right: left + u32::try_from(width).unwrap_or(0),
        }
    }

    /// Iterate covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoordinate> + '_ {
        let (top, bottom, left, right) = (self.top, self.bottom, self.left, self.right);
        (top..=bottom)
            .flat_map(move |r| (left..=right).map(move |c| CellCoordinate::new(r, c)))
    }
}

/// Pixel rectangle of a cell or region in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
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

    #[test]
    fn test_bounds_normalize() {
        let b = AreaBounds::new(5, 7, 2, 3);
        assert_eq!(b, AreaBounds::new(2, 3, 5, 7));
        assert!(b.top <= b.bottom && b.left <= b.right);
    }

    #[test]
    fn test_between_any_corner_order() {
        let a = CellCoordinate::new(4, 1);
        let b = CellCoordinate::new(1, 6);
        let bounds = AreaBounds::between(a, b);
        assert_eq!(
            bounds,
            AreaBounds {
                top: 1,
                left: 1,
                bottom: 4,
                right: 6
            }
        );
    }

    #[test]
    fn test_contains_and_subset() {
        let outer = AreaBounds::new(0, 0, 9, 9);
        let inner = AreaBounds::new(2, 2, 4, 4);
        assert!(inner.is_subset_of(&outer));
        assert!(!outer.is_subset_of(&inner));
        assert!(inner.contains(CellCoordinate::new(3, 2)));
        assert!(!inner.contains(CellCoordinate::new(5, 2)));
    }

    #[test]
    fn test_translate_clamps_without_resizing() {
        let limit = AreaBounds::new(0, 0, 9, 9);
        let region = AreaBounds::new(2, 2, 4, 4);

        let moved = region.translated_within(3, -1, &limit);
        assert_eq!(moved, AreaBounds::new(5, 1, 7, 3));

        // Pushing past the edge clamps but keeps the 3x3 size
        let clamped = region.translated_within(100, 100, &limit);
        assert_eq!(clamped, AreaBounds::new(7, 7, 9, 9));
        assert_eq!(clamped.row_count(), 3);
        assert_eq!(clamped.column_count(), 3);

        let clamped = region.translated_within(-100, -100, &limit);
        assert_eq!(clamped, AreaBounds::new(0, 0, 2, 2));
    }

    #[test]
    fn test_cells_row_major() {
        let b = AreaBounds::new(1, 1, 2, 2);
        let cells: Vec<_> = b.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoordinate::new(1, 1),
                CellCoordinate::new(1, 2),
                CellCoordinate::new(2, 1),
                CellCoordinate::new(2, 2),
            ]
        );
    }
}
