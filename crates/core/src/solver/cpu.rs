//! CPU-based lattice-Boltzmann solver
//!
//! This module provides the CPU implementation of the `FlowSolver` trait using flat
//! `Vec` buffers and Rayon for parallelism.
//!
//! # Step structure
//!
//! 1. **Stream**: every cell pulls population `k` from its upstream neighbour
//!    `(x - ex[k], y - ey[k])`, periodic on both axes. Reads `populations`, writes
//!    `staging`.
//! 2. **Collide / bounce-back**: reads `staging`, writes `populations`. Solid cells
//!    reflect each incoming population into the antipodal slot and add its momentum to
//!    the force accumulators; fluid cells relax toward the BGK equilibrium.
//!
//! Each pass reads one buffer and writes the other, so rows can be processed in any
//! order on any thread.

use super::config::SolverConfig;
use super::lattice::{
    equilibrium, moments, relaxation_frequency, Populations, EX, EY, OPPOSITE, Q, WEIGHTS,
};
use super::metrics::{ForceAccumulator, StepMetrics};
use super::FlowSolver;
use crate::core_types::Vec2;
use crate::error::SimError;
use crate::grid::{FieldData, ObstacleGrid};
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::{debug, info, trace};

/// Index of the upstream neighbour along one axis, with periodic wrap
#[inline(always)]
fn upstream(coord: usize, offset: i32, extent: usize) -> usize {
    match offset {
        1 => {
            if coord == 0 {
                extent - 1
            } else {
                coord - 1
            }
        }
        -1 => {
            if coord + 1 == extent {
                0
            } else {
                coord + 1
            }
        }
        _ => coord,
    }
}

/// D2Q9 BGK solver with bounce-back obstacles, running on Rayon
///
/// The solver performs no clamping. An inlet speed beyond the lattice stability bound
/// diverges silently; watch [`StepMetrics::peak_speed`].
pub struct CpuLbmSolver {
    // Post-collision populations (read by streaming)
    populations: Vec<Populations>,
    // Post-stream populations (read by collision)
    staging: Vec<Populations>,

    density: FieldData<f32>,
    velocity: FieldData<Vec2>,
    obstacles: ObstacleGrid,

    width: usize,
    height: usize,
    viscosity: f32,
    omega: f32,
}

impl CpuLbmSolver {
    /// Create a solver at rest equilibrium with no obstacles
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails [`SolverConfig::validate`].
    pub fn new(config: &SolverConfig) -> Result<Self, SimError> {
        config.validate()?;
        let SolverConfig {
            width,
            height,
            viscosity,
        } = *config;
        let omega = relaxation_frequency(viscosity);
        let cells = width * height;

        info!(
            "Created LBM solver: {}x{} grid, viscosity={}, omega={:.4}",
            width, height, viscosity, omega
        );

        Ok(Self {
            populations: vec![WEIGHTS; cells],
            staging: vec![WEIGHTS; cells],
            density: FieldData::with_value(width, height, 1.0),
            velocity: FieldData::with_value(width, height, Vec2::zeros()),
            obstacles: ObstacleGrid::empty(width, height),
            width,
            height,
            viscosity,
            omega,
        })
    }

    /// Kinematic viscosity in lattice units
    #[must_use]
    pub fn viscosity(&self) -> f32 {
        self.viscosity
    }

    /// BGK relaxation frequency ω
    #[must_use]
    pub fn omega(&self) -> f32 {
        self.omega
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        y * self.width + x
    }

    /// Density at `(x, y)`
    #[must_use]
    pub fn density_at(&self, x: usize, y: usize) -> f32 {
        self.density.get(x, y)
    }

    /// Velocity at `(x, y)`; always zero on solid cells
    #[must_use]
    pub fn velocity_at(&self, x: usize, y: usize) -> Vec2 {
        self.velocity.get(x, y)
    }

    /// Density field
    #[must_use]
    pub fn density_field(&self) -> &FieldData<f32> {
        &self.density
    }

    /// Velocity field
    #[must_use]
    pub fn velocity_field(&self) -> &FieldData<Vec2> {
        &self.velocity
    }

    /// Populations of the cell at `(x, y)`
    #[must_use]
    pub fn populations_at(&self, x: usize, y: usize) -> Populations {
        self.populations[self.index(x, y)]
    }

    /// Overwrite the populations of one cell and refresh its ρ and **u**
    ///
    /// **u** stays zero if the cell is solid.
    pub fn set_populations(&mut self, x: usize, y: usize, f: Populations) {
        let idx = self.index(x, y);
        self.populations[idx] = f;
        let (rho, u) = moments(&f);
        self.density.set(x, y, rho);
        self.store_velocity(x, y, u);
    }

    /// Overwrite every cell's populations and refresh ρ and **u**
    pub fn fill_populations(&mut self, f: Populations) {
        let (rho, u) = moments(&f);
        self.populations.fill(f);
        self.density.fill(rho);
        self.velocity.fill(u);
        self.pin_solid_velocity();
    }

    /// Put one cell at the equilibrium of `rho` and `u`
    ///
    /// **u** stays zero if the cell is solid.
    pub fn set_equilibrium(&mut self, x: usize, y: usize, rho: f32, u: Vec2) {
        let idx = self.index(x, y);
        self.populations[idx] = equilibrium(rho, u);
        self.density.set(x, y, rho);
        self.store_velocity(x, y, u);
    }

    #[inline]
    fn store_velocity(&mut self, x: usize, y: usize, u: Vec2) {
        let u = if self.obstacles.is_solid(x, y) {
            Vec2::zeros()
        } else {
            u
        };
        self.velocity.set(x, y, u);
    }

    /// Zero the stored velocity of every solid cell
    fn pin_solid_velocity(&mut self) {
        let solid = self.obstacles.as_slice();
        self.velocity
            .as_mut_slice()
            .par_iter_mut()
            .zip(solid.par_iter())
            .for_each(|(u, &is_solid)| {
                if is_solid {
                    *u = Vec2::zeros();
                }
            });
    }

    /// Sum of all populations over the grid
    ///
    /// Streaming, bounce-back and BGK collision all conserve this quantity; the inlet
    /// does not.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.populations
            .par_iter()
            .map(|f| f.iter().map(|&v| f64::from(v)).sum::<f64>())
            .sum()
    }

    /// Edit the obstacle grid in place
    ///
    /// Cells that are solid after `edit` returns report zero velocity immediately,
    /// without waiting for the next step.
    ///
    /// # Returns
    ///
    /// Whatever `edit` returns
    pub fn edit_obstacles<R>(&mut self, edit: impl FnOnce(&mut ObstacleGrid) -> R) -> R {
        let result = edit(&mut self.obstacles);
        self.pin_solid_velocity();
        result
    }

    /// Replace the obstacle grid
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DimensionMismatch`] if `grid` is not `width × height`.
    pub fn set_obstacles(&mut self, grid: ObstacleGrid) -> Result<(), SimError> {
        if grid.dimensions() != (self.width, self.height) {
            return Err(SimError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: grid.dimensions(),
            });
        }
        self.obstacles = grid;
        self.pin_solid_velocity();
        Ok(())
    }

    /// Remove every obstacle
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Curl of the velocity field, `∂u_y/∂x − ∂u_x/∂y`
    ///
    /// Central differences with neighbours clamped at the grid edges; solid cells
    /// report zero.
    #[must_use]
    pub fn vorticity(&self) -> FieldData<f32> {
        let (width, height) = (self.width, self.height);
        let u = self.velocity.as_slice();
        let solid = self.obstacles.as_slice();
        let mut curl = FieldData::new(width, height);

        curl.as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let y_minus = y.saturating_sub(1);
                let y_plus = (y + 1).min(height - 1);
                for (x, value) in row.iter_mut().enumerate() {
                    let idx = y * width + x;
                    if solid[idx] {
                        *value = 0.0;
                        continue;
                    }
                    let x_minus = x.saturating_sub(1);
                    let x_plus = (x + 1).min(width - 1);
                    let duy_dx = (u[y * width + x_plus].y - u[y * width + x_minus].y) * 0.5;
                    let dux_dy = (u[y_plus * width + x].x - u[y_minus * width + x].x) * 0.5;
                    *value = duy_dx - dux_dy;
                }
            });

        curl
    }

    /// Streaming pass: `populations` → `staging`
    fn stream(&mut self) {
        let (width, height) = (self.width, self.height);
        let source = &self.populations;

        self.staging
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    for k in 0..Q {
                        let sx = upstream(x, EX[k], width);
                        let sy = upstream(y, EY[k], height);
                        cell[k] = source[sy * width + sx][k];
                    }
                }
            });
    }

    /// Collision and bounce-back pass: `staging` → `populations`
    fn collide(&mut self) -> ForceAccumulator {
        let width = self.width;
        let omega = self.omega;
        let staging = &self.staging;
        let solid = self.obstacles.as_slice();

        self.populations
            .par_chunks_mut(width)
            .zip(self.density.as_mut_slice().par_chunks_mut(width))
            .zip(self.velocity.as_mut_slice().par_chunks_mut(width))
            .enumerate()
            .map(|(y, ((f_row, rho_row), u_row))| {
                let mut acc = ForceAccumulator::default();

                for x in 0..width {
                    let idx = y * width + x;
                    let incoming = &staging[idx];

                    if solid[idx] {
                        for k in 0..Q {
                            let value = incoming[k];
                            f_row[x][OPPOSITE[k]] = value;
                            acc.add_reflection(value, EX[k], EY[k]);
                        }
                        u_row[x] = Vec2::zeros();
                        continue;
                    }

                    let (rho, u) = moments(incoming);
                    acc.observe_speed_sq(u.norm_squared());

                    let feq = equilibrium(rho, u);
                    let cell = &mut f_row[x];
                    for k in 0..Q {
                        cell[k] = incoming[k] + omega * (feq[k] - incoming[k]);
                    }
                    rho_row[x] = rho;
                    u_row[x] = u;
                }

                acc
            })
            .reduce(ForceAccumulator::default, ForceAccumulator::combine)
    }
}

impl FlowSolver for CpuLbmSolver {
    fn reset(&mut self, clear_obstacles: bool) {
        debug!("Resetting flow to rest (clear_obstacles={})", clear_obstacles);
        self.populations.fill(WEIGHTS);
        self.staging.fill(WEIGHTS);
        self.density.fill(1.0);
        self.velocity.fill(Vec2::zeros());
        if clear_obstacles {
            self.obstacles.clear();
        }
    }

    fn set_inlet(&mut self, speed: f32) {
        let feq = equilibrium(1.0, Vec2::new(speed, 0.0));
        for row in self.populations.chunks_mut(self.width) {
            row[0] = feq;
            row[1] = feq;
        }
    }

    fn step(&mut self) -> StepMetrics {
        self.stream();
        let metrics = self.collide().finish();
        trace!(
            "Step: drag={:.6e} lift={:.6e} peak_speed={:.4}",
            metrics.drag,
            metrics.lift,
            metrics.peak_speed
        );
        metrics
    }

    fn read_velocity(&self) -> Cow<'_, [Vec2]> {
        Cow::Borrowed(self.velocity.as_slice())
    }

    fn read_density(&self) -> Cow<'_, [f32]> {
        Cow::Borrowed(self.density.as_slice())
    }

    fn obstacles(&self) -> &ObstacleGrid {
        &self.obstacles
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
