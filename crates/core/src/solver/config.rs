//! Solver configuration

use super::quality::QualityPreset;
use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Construction-time parameters of the lattice-Boltzmann solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Grid width in cells (flow runs along +x)
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Kinematic viscosity in lattice units
    pub viscosity: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::from_preset(QualityPreset::Medium, 0.015)
    }
}

impl SolverConfig {
    /// Configuration with the grid size of a quality preset
    #[must_use]
    pub fn from_preset(quality: QualityPreset, viscosity: f32) -> Self {
        let (width, height) = quality.grid_dimensions();
        Self {
            width,
            height,
            viscosity,
        }
    }

    /// Check that the grid and viscosity can be simulated
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidDimensions`] if width < 2 or height < 1
    /// - [`SimError::InvalidViscosity`] if viscosity is not finite and positive
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width < 2 || self.height < 1 {
            return Err(SimError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.viscosity.is_finite() || self.viscosity <= 0.0 {
            return Err(SimError::InvalidViscosity(self.viscosity));
        }
        Ok(())
    }
}
