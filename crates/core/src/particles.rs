//! Tracer particles for streamline visualization
//!
//! A fixed-size swarm of massless tracers is carried through the solver's velocity
//! field. Tracers that leave the grid or land on a solid cell are recycled near the
//! inlet on one of a set of horizontal lanes, which keeps the swarm drawing
//! streaklines from the left edge.
//!
//! # Update rule
//!
//! Per particle, independently:
//! - truncate the position to a cell; if that cell is outside the grid or solid (or the
//!   position is not finite), respawn on a random lane with `x ∈ [0, respawn_fraction · W)`;
//! - otherwise add the cell's velocity (explicit Euler, one step per call) and wrap `y`
//!   periodically. `x` is not wrapped: leaving past the right edge triggers a respawn on
//!   the next call.

use crate::core_types::Vec2;
use crate::grid::ObstacleGrid;
use crate::solver::FlowSolver;
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration of the tracer swarm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Requested particle count; the remainder after splitting across lanes is dropped
    pub count: usize,
    /// Rows per lane; the lane count is `height / lane_spacing` (at least one)
    pub lane_spacing: usize,
    /// Distance of the outermost lanes from the top and bottom rows
    pub lane_margin: f32,
    /// Respawned particles get `x ∈ [0, respawn_fraction · width)`
    pub respawn_fraction: f32,
    /// Seed for reproducible runs; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200_000,
            lane_spacing: 9,
            lane_margin: 2.0,
            respawn_fraction: 0.1,
            seed: None,
        }
    }
}

/// Evenly spaced lane heights from `margin` to `height - margin`
fn lane_positions(config: &ParticleConfig, height: usize) -> Vec<f32> {
    let lane_count = if config.lane_spacing == 0 {
        1
    } else {
        (height / config.lane_spacing).max(1)
    };
    let h = height as f32;
    let margin = config.lane_margin.clamp(0.0, h / 2.0);
    let top = (h - 1.0).max(0.0);

    if lane_count == 1 {
        return vec![margin.min(top)];
    }

    let span = h - 2.0 * margin;
    (0..lane_count)
        .map(|i| {
            let lane = margin + span * i as f32 / (lane_count - 1) as f32;
            lane.clamp(0.0, top)
        })
        .collect()
}

/// Random spawn point on a lane near the inlet
fn respawn_position<R: Rng>(rng: &mut R, lanes: &[f32], max_x: f32) -> Vec2 {
    let lane = lanes[rng.random_range(0..lanes.len())];
    let x = if max_x > 0.0 {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    };
    Vec2::new(x, lane)
}

/// Wrap `y` into `[0, height)`
#[inline]
fn wrap_periodic(y: f32, height: f32) -> f32 {
    let wrapped = y.rem_euclid(height);
    // rem_euclid can round up to `height` for tiny negative inputs
    if wrapped < height {
        wrapped
    } else {
        0.0
    }
}

/// Fixed-size swarm of tracer particles
pub struct ParticleAdvector {
    positions: Vec<Vec2>,
    lanes: Vec<f32>,
    width: usize,
    height: usize,
    respawn_fraction: f32,
    rng: StdRng,
}

impl ParticleAdvector {
    /// Seed a swarm for a `width × height` grid
    ///
    /// Uses `config.seed` when set, otherwise OS entropy.
    #[must_use]
    pub fn new(config: &ParticleConfig, width: usize, height: usize) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, width, height, rng)
    }

    /// Seed a swarm using the given random source
    ///
    /// The same generator state always produces the same initial and respawned
    /// positions, independent of how Rayon schedules the update.
    #[must_use]
    pub fn with_rng(config: &ParticleConfig, width: usize, height: usize, mut rng: StdRng) -> Self {
        let lanes = lane_positions(config, height);
        let per_lane = config.count / lanes.len();
        let total = per_lane * lanes.len();

        debug!(
            "Seeding {} particles on {} lanes ({} per lane, {} dropped)",
            total,
            lanes.len(),
            per_lane,
            config.count - total
        );

        let mut positions = Vec::with_capacity(total);
        for &lane in &lanes {
            for _ in 0..per_lane {
                let x = if width > 0 {
                    rng.random_range(0.0..width as f32)
                } else {
                    0.0
                };
                positions.push(Vec2::new(x, lane));
            }
        }

        Self {
            positions,
            lanes,
            width,
            height,
            respawn_fraction: config.respawn_fraction,
            rng,
        }
    }

    /// Current particle positions in grid coordinates
    #[must_use]
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Mutable particle positions, e.g. for placing tracers by hand
    pub fn positions_mut(&mut self) -> &mut [Vec2] {
        &mut self.positions
    }

    /// Lane heights used at seed and respawn time
    #[must_use]
    pub fn lanes(&self) -> &[f32] {
        &self.lanes
    }

    /// Number of particles
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the swarm is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Upper bound (exclusive) of respawn `x`
    #[must_use]
    pub fn respawn_limit(&self) -> f32 {
        self.respawn_fraction * self.width as f32
    }

    /// Advance every particle one step through `velocity`
    ///
    /// # Arguments
    ///
    /// * `velocity` - Row-major velocity field of the same grid as `obstacles`
    /// * `obstacles` - Solid cells; particles landing on one respawn
    ///
    /// # Panics
    ///
    /// Panics if the grids do not match the advector's dimensions
    pub fn update(&mut self, velocity: &[Vec2], obstacles: &ObstacleGrid) {
        let (width, height) = (self.width, self.height);
        assert_eq!(
            obstacles.dimensions(),
            (width, height),
            "Obstacle grid does not match particle domain"
        );
        assert_eq!(
            velocity.len(),
            width * height,
            "Velocity field does not match particle domain"
        );

        let base_seed: u64 = self.rng.random();
        let max_x = self.respawn_limit();
        let lanes = &self.lanes;
        let h = height as f32;

        self.positions
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, p)| {
                let fluid_cell = if p.x.is_finite() && p.y.is_finite() {
                    // Truncation toward zero
                    let (ix, iy) = (p.x as i64, p.y as i64);
                    match obstacles.get_checked(ix, iy) {
                        Some(false) => Some(iy as usize * width + ix as usize),
                        _ => None,
                    }
                } else {
                    None
                };

                match fluid_cell {
                    Some(idx) => {
                        let next = *p + velocity[idx];
                        *p = Vec2::new(next.x, wrap_periodic(next.y, h));
                    }
                    None => {
                        let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                        *p = respawn_position(&mut rng, lanes, max_x);
                    }
                }
            });
    }

    /// Advance every particle through the current field of `solver`
    pub fn advect_with(&mut self, solver: &dyn FlowSolver) {
        let velocity = solver.read_velocity();
        self.update(&velocity, solver.obstacles());
    }
}
