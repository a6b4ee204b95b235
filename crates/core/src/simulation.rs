//! Frame-level composition of solver and tracers
//!
//! `WindTunnel` runs the fixed phase order of one rendered frame: several inlet +
//! step sub-steps on the fluid, then a single particle update on the settled
//! velocity field. Every sub-step also feeds an exponential moving average of drag
//! and lift. Ramp schedules, timers and sweeps belong to the caller.

use crate::core_types::Vec2;
use crate::error::SimError;
use crate::grid::airfoil;
use crate::particles::{ParticleAdvector, ParticleConfig};
use crate::solver::{CpuLbmSolver, FlowSolver, SmoothedForces, SolverConfig, StepMetrics};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration for a complete tunnel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunnelConfig {
    /// Fluid grid and viscosity
    pub solver: SolverConfig,
    /// Tracer swarm
    pub particles: ParticleConfig,
    /// Solver steps per particle update
    pub substeps_per_frame: u32,
    /// Airfoil chord as a fraction of the grid width
    pub chord_fraction: f32,
    /// Weight of each new step in the drag/lift moving average, in `(0, 1]`
    pub force_smoothing: f64,
}

/// Moving-average weight per solver step
pub const DEFAULT_FORCE_SMOOTHING: f64 = 0.005;

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            particles: ParticleConfig::default(),
            substeps_per_frame: 4,
            chord_fraction: 1.0 / 3.0,
            force_smoothing: DEFAULT_FORCE_SMOOTHING,
        }
    }
}

/// Fluid solver plus tracer swarm over one grid
pub struct WindTunnel {
    solver: CpuLbmSolver,
    particles: ParticleAdvector,
    substeps_per_frame: u32,
    chord_fraction: f32,
    force_smoothing: f64,
    smoothed: SmoothedForces,
}

impl WindTunnel {
    /// Build a tunnel at rest with no obstacles
    ///
    /// # Errors
    ///
    /// Returns an error if the solver configuration is invalid.
    pub fn new(config: &TunnelConfig) -> Result<Self, SimError> {
        let solver = CpuLbmSolver::new(&config.solver)?;
        let (width, height) = solver.dimensions();
        let particles = ParticleAdvector::new(&config.particles, width, height);

        let force_smoothing = if config.force_smoothing > 0.0 && config.force_smoothing <= 1.0 {
            config.force_smoothing
        } else {
            warn!(
                "Force smoothing {} is outside (0, 1], using {}",
                config.force_smoothing, DEFAULT_FORCE_SMOOTHING
            );
            DEFAULT_FORCE_SMOOTHING
        };

        info!(
            "Wind tunnel ready: {}x{} cells, {} tracers, {} sub-steps per frame",
            width,
            height,
            particles.len(),
            config.substeps_per_frame
        );

        Ok(Self {
            solver,
            particles,
            substeps_per_frame: config.substeps_per_frame,
            chord_fraction: config.chord_fraction,
            force_smoothing,
            smoothed: SmoothedForces::default(),
        })
    }

    /// The fluid solver
    #[must_use]
    pub fn solver(&self) -> &CpuLbmSolver {
        &self.solver
    }

    /// Mutable fluid solver, for obstacle edits and direct state access
    pub fn solver_mut(&mut self) -> &mut CpuLbmSolver {
        &mut self.solver
    }

    /// The tracer swarm
    #[must_use]
    pub fn particles(&self) -> &ParticleAdvector {
        &self.particles
    }

    /// Moving average of drag and lift over every sub-step since the last reset
    #[must_use]
    pub fn smoothed_forces(&self) -> SmoothedForces {
        self.smoothed
    }

    /// Replace the current obstacles with an airfoil centred in the domain
    ///
    /// The chord is `chord_fraction · width` and the quarter-chord point sits at the
    /// grid centre.
    ///
    /// # Returns
    ///
    /// Number of solid cells
    pub fn place_airfoil(&mut self, code: &str, angle_degrees: f32) -> usize {
        let (width, height) = self.solver.dimensions();
        let center = Vec2::new((width / 2) as f32, (height / 2) as f32);
        let chord = self.chord_fraction * width as f32;

        self.solver.edit_obstacles(|obstacles| {
            obstacles.clear();
            airfoil::stamp(obstacles, code, center, chord, angle_degrees)
        })
    }

    /// Run one frame: `substeps_per_frame` × (inlet, step), then one particle update
    ///
    /// Every sub-step is folded into [`smoothed_forces`](Self::smoothed_forces).
    ///
    /// # Returns
    ///
    /// Raw metrics of the last sub-step (default metrics if there were none)
    pub fn advance_frame(&mut self, inlet_speed: f32) -> StepMetrics {
        let mut metrics = StepMetrics::default();
        for _ in 0..self.substeps_per_frame {
            self.solver.set_inlet(inlet_speed);
            metrics = self.solver.step();
            self.smoothed.update(&metrics, self.force_smoothing);
        }
        self.particles.advect_with(&self.solver);
        metrics
    }

    /// Return the fluid to rest and clear the force average
    pub fn reset(&mut self, clear_obstacles: bool) {
        debug!("Resetting wind tunnel");
        self.solver.reset(clear_obstacles);
        self.smoothed.clear();
    }
}
