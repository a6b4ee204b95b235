//! Per-step force and peak-speed reduction

use serde::{Deserialize, Serialize};

/// Scalar outputs of one solver step, in lattice units
///
/// Drag and lift come from momentum exchange at solid cells. `peak_speed` is the
/// largest fluid-cell speed of the step; callers watch it to detect divergence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Net x momentum handed to obstacles this step
    pub drag: f64,
    /// Net y momentum handed to obstacles this step (grid y grows downward)
    pub lift: f64,
    /// `sqrt(max |u|²)` over fluid cells
    pub peak_speed: f64,
}

/// Exponential moving average of drag and lift across solver steps
///
/// Single-step momentum-exchange forces are noisy; report this instead. Starts at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SmoothedForces {
    /// Averaged drag in lattice units
    pub drag: f64,
    /// Averaged lift in lattice units (grid y grows downward)
    pub lift: f64,
}

impl SmoothedForces {
    /// Fold one step into the average: `avg = alpha · sample + (1 − alpha) · avg`
    #[inline]
    pub fn update(&mut self, metrics: &StepMetrics, alpha: f64) {
        self.drag = metrics.drag * alpha + self.drag * (1.0 - alpha);
        self.lift = metrics.lift * alpha + self.lift * (1.0 - alpha);
    }

    /// Forget all history
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Partial reduction state for one chunk of cells
///
/// `combine` is associative and commutative (sum, sum, max), so chunks may be merged
/// in any order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ForceAccumulator {
    pub drag: f64,
    pub lift: f64,
    pub max_speed_sq: f64,
}

impl ForceAccumulator {
    /// Record one reflected population travelling along `(ex, ey)`
    #[inline]
    pub fn add_reflection(&mut self, value: f32, ex: i32, ey: i32) {
        let v = f64::from(value);
        self.drag += 2.0 * v * f64::from(ex);
        self.lift += 2.0 * v * f64::from(ey);
    }

    #[inline]
    pub fn observe_speed_sq(&mut self, speed_sq: f32) {
        self.max_speed_sq = self.max_speed_sq.max(f64::from(speed_sq));
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            drag: self.drag + other.drag,
            lift: self.lift + other.lift,
            max_speed_sq: self.max_speed_sq.max(other.max_speed_sq),
        }
    }

    pub fn finish(self) -> StepMetrics {
        StepMetrics {
            drag: self.drag,
            lift: self.lift,
            peak_speed: self.max_speed_sq.sqrt(),
        }
    }
}
