//! Flow solver trait definition
//!
//! This module defines the `FlowSolver` trait, the seam between the fluid engine and
//! its consumers (particle advection, visualization, drivers). Any backend that keeps
//! the streaming/collision double-buffering discipline can sit behind it.

use super::metrics::StepMetrics;
use crate::core_types::Vec2;
use crate::grid::ObstacleGrid;
use std::borrow::Cow;

/// Backend-agnostic interface for a 2D lattice-Boltzmann flow solver
///
/// Calls are synchronous: when `step` returns, every field read afterwards reflects the
/// completed step.
pub trait FlowSolver: Send + Sync {
    /// Reset every cell to rest equilibrium (ρ = 1, u = 0)
    ///
    /// # Arguments
    ///
    /// * `clear_obstacles` - Also clear the obstacle grid
    fn reset(&mut self, clear_obstacles: bool);

    /// Overwrite the first two columns with the equilibrium of ρ = 1 and
    /// `u = (speed, 0)`
    ///
    /// Acts as a fixed-velocity inlet; call it before every `step`.
    fn set_inlet(&mut self, speed: f32);

    /// Advance one stream + collide step
    ///
    /// # Returns
    ///
    /// Drag, lift and peak speed accumulated during this step
    fn step(&mut self) -> StepMetrics;

    /// Read velocity field in row-major order
    fn read_velocity(&self) -> Cow<'_, [Vec2]>;

    /// Read density field in row-major order
    fn read_density(&self) -> Cow<'_, [f32]>;

    /// Current obstacle grid
    fn obstacles(&self) -> &ObstacleGrid;

    /// Get grid dimensions
    ///
    /// # Returns
    ///
    /// Tuple of `(width, height)` in cells
    fn dimensions(&self) -> (usize, usize);
}
