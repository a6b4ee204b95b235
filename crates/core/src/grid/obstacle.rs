//! Solid-cell occupancy grid
//!
//! The obstacle grid has its own lifetime: the rasterizer and manual edits write it,
//! the solver and particle advector only read it.

use super::field::FieldData;

/// Boolean occupancy grid, `true` for solid cells
pub type ObstacleGrid = FieldData<bool>;

impl FieldData<bool> {
    /// Create an empty (all-fluid) obstacle grid
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self::with_value(width, height, false)
    }

    /// Whether the cell at `(x, y)` is solid
    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.get(x, y)
    }

    /// Mark every cell in the half-open rectangle `[x0, x1) × [y0, y1)` as solid
    ///
    /// The rectangle is clipped to the grid.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, true);
            }
        }
    }

    /// Clear every solid cell
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Number of solid cells
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.as_slice().iter().filter(|&&solid| solid).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut grid = ObstacleGrid::empty(8, 4);
        grid.fill_rect(6, 2, 12, 10);
        assert_eq!(grid.solid_count(), 4);
        assert!(grid.is_solid(7, 3));
        assert!(!grid.is_solid(5, 3));
    }

    #[test]
    fn test_clear() {
        let mut grid = ObstacleGrid::empty(4, 4);
        grid.fill_rect(0, 0, 4, 4);
        assert_eq!(grid.solid_count(), 16);
        grid.clear();
        assert_eq!(grid.solid_count(), 0);
    }
}
