//! Quality presets for grid resolution
//!
//! Higher quality means a finer lattice over the same tunnel cross-section, at
//! proportionally higher cost per step.

use serde::{Deserialize, Serialize};

/// Quality preset determining grid resolution
///
/// All presets keep the 12:5 tunnel aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityPreset {
    /// 300×125 cells
    Low,
    /// 600×250 cells
    #[default]
    Medium,
    /// 1200×500 cells
    High,
}

impl QualityPreset {
    /// Grid rows for this preset
    #[must_use]
    pub const fn rows(&self) -> usize {
        match self {
            Self::Low => 125,
            Self::Medium => 250,
            Self::High => 500,
        }
    }

    /// Calculate grid dimensions
    ///
    /// # Returns
    ///
    /// Tuple of `(width, height)` in cells
    #[must_use]
    pub const fn grid_dimensions(&self) -> (usize, usize) {
        let rows = self.rows();
        (rows * 12 / 5, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(QualityPreset::Low.grid_dimensions(), (300, 125));
        assert_eq!(QualityPreset::Medium.grid_dimensions(), (600, 250));
        assert_eq!(QualityPreset::High.grid_dimensions(), (1200, 500));
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(QualityPreset::default(), QualityPreset::Medium);
    }
}
