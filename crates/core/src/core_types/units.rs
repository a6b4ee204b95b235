//! Physical unit types and lattice-to-physical scaling
//!
//! The solver works entirely in lattice units: one cell per unit length, one step per
//! unit time, reference density 1. This module converts those numbers into SI values
//! for reporting, using the wind-tunnel geometry the lattice stands in for.
//!
//! # Usage
//! ```
//! use airflow_sim_core::core_types::units::LatticeScaling;
//!
//! let scaling = LatticeScaling::for_height(250);
//! // A 0.1 lattice inlet corresponds to the configured 30 m/s air speed.
//! assert!((*scaling.wind_speed(0.1) - 30.0).abs() < 1e-3);
//! ```

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Deref, Mul, Neg, Sub};

/// Highest lattice speed the D2Q9 scheme can represent (≈ 1/√3, the lattice speed of
/// sound). Peak speeds above this mean the run has diverged.
pub const MAX_STABLE_LATTICE_SPEED: f64 = 0.577;

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f32);

impl Meters {
    /// Create a new distance in meters
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f32) -> Self {
        assert!(value >= 0.0, "Meters::new: negative distance is invalid");
        Meters(value)
    }
}

impl Deref for Meters {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} m", self.0)
    }
}

/// Duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f32);

impl Seconds {
    /// Create a new duration in seconds
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f32) -> Self {
        assert!(value >= 0.0, "Seconds::new: negative duration is invalid");
        Seconds(value)
    }
}

impl Deref for Seconds {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3e} s", self.0)
    }
}

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f32);

impl MetersPerSecond {
    /// Create a new speed
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        MetersPerSecond(value)
    }
}

impl Deref for MetersPerSecond {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m/s", self.0)
    }
}

/// Force in newtons (per cell of span depth)
///
/// Signed: drag is positive downstream, lift positive upward.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Newtons(f64);

impl Newtons {
    /// Create a new force
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        Newtons(value)
    }
}

impl Deref for Newtons {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Add for Newtons {
    type Output = Newtons;
    fn add(self, rhs: Newtons) -> Newtons {
        Newtons(self.0 + rhs.0)
    }
}

impl Sub for Newtons {
    type Output = Newtons;
    fn sub(self, rhs: Newtons) -> Newtons {
        Newtons(self.0 - rhs.0)
    }
}

impl Mul<f64> for Newtons {
    type Output = Newtons;
    fn mul(self, rhs: f64) -> Newtons {
        Newtons(self.0 * rhs)
    }
}

impl Neg for Newtons {
    type Output = Newtons;
    fn neg(self) -> Newtons {
        Newtons(-self.0)
    }
}

impl fmt::Display for Newtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} N", self.0)
    }
}

/// Drag and lift converted out of lattice units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalForces {
    /// Streamwise force
    pub drag: Newtons,
    /// Cross-stream force, positive up
    pub lift: Newtons,
}

/// Conversion factors between lattice units and the wind tunnel they model
///
/// `dx` follows from the tunnel height spread across the grid rows; `dt` is chosen so
/// that `lattice_speed` cells/step equals `air_speed` m/s.
///
/// Fields are public and deserializable, so a loaded scaling should pass
/// [`validate`](Self::validate) before any conversion is asked of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeScaling {
    /// Physical height of the tunnel cross-section
    pub tunnel_height: Meters,
    /// Free-stream air speed the reference lattice speed stands for
    pub air_speed: MetersPerSecond,
    /// Air density in kg/m³
    pub air_density: f32,
    /// Lattice inlet speed that corresponds to `air_speed`
    pub lattice_speed: f32,
    /// Number of grid rows spanning `tunnel_height`
    pub cells_high: usize,
}

impl Default for LatticeScaling {
    fn default() -> Self {
        Self {
            tunnel_height: Meters::new(1.25),
            air_speed: MetersPerSecond::new(30.0),
            air_density: 1.225,
            lattice_speed: 0.1,
            cells_high: 250,
        }
    }
}

impl LatticeScaling {
    /// Default tunnel parameters for a grid with `cells_high` rows
    #[must_use]
    pub fn for_height(cells_high: usize) -> Self {
        Self {
            cells_high,
            ..Self::default()
        }
    }

    /// Check that every parameter is finite and positive
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidScaling`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SimError> {
        let fields = [
            ("tunnel_height", f64::from(*self.tunnel_height)),
            ("air_speed", f64::from(*self.air_speed)),
            ("air_density", f64::from(self.air_density)),
            ("lattice_speed", f64::from(self.lattice_speed)),
            ("cells_high", self.cells_high as f64),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidScaling { field, value });
            }
        }
        Ok(())
    }

    /// Physical size of one cell
    ///
    /// # Panics
    ///
    /// Panics if `tunnel_height` is negative or NaN.
    #[must_use]
    pub fn dx(&self) -> Meters {
        Meters::new(*self.tunnel_height / self.cells_high.max(1) as f32)
    }

    /// Physical duration of one solver step
    ///
    /// # Panics
    ///
    /// Panics if the scaling would give a negative or NaN duration, which
    /// [`validate`](Self::validate) rules out.
    #[must_use]
    pub fn dt(&self) -> Seconds {
        Seconds::new(self.lattice_speed * *self.dx() / *self.air_speed)
    }

    /// Multiplier from lattice momentum per step to newtons
    ///
    /// `ρ_air · dx³ / dt²`
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`dt`](Self::dt).
    #[must_use]
    pub fn force_scale(&self) -> f64 {
        let dx = f64::from(*self.dx());
        let dt = f64::from(*self.dt());
        f64::from(self.air_density) * dx.powi(3) / (dt * dt)
    }

    /// Convert a lattice inlet speed to m/s
    #[must_use]
    pub fn wind_speed(&self, lattice_inlet: f32) -> MetersPerSecond {
        MetersPerSecond::new(lattice_inlet / self.lattice_speed * *self.air_speed)
    }

    /// Convert lattice drag/lift into newtons
    ///
    /// Grid rows grow downward, so lattice lift is negated to report upward lift as
    /// positive.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`dt`](Self::dt).
    #[must_use]
    pub fn to_physical(&self, drag: f64, lift: f64) -> PhysicalForces {
        let scale = self.force_scale();
        PhysicalForces {
            drag: Newtons::new(drag) * scale,
            lift: -(Newtons::new(lift) * scale),
        }
    }
}
