//! Error type for rejected simulation inputs
//!
//! Only construction-time and shape errors are reported here. Numerical trouble
//! (zero density, an unstable inlet) is never an error: it is handled in-line or
//! surfaced through the step metrics.

use std::fmt;

/// Errors returned when a solver, tunnel, or grid is given input it cannot use.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Grid too small: the inlet needs at least two columns and one row.
    InvalidDimensions {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
    },

    /// Viscosity must be finite and positive so that 0 < ω < 2.
    InvalidViscosity(f32),

    /// A grid of the wrong shape was handed to the solver.
    DimensionMismatch {
        /// `(width, height)` the solver was built with
        expected: (usize, usize),
        /// `(width, height)` that was supplied
        actual: (usize, usize),
    },

    /// A lattice-to-physical scaling parameter is zero, negative, or not finite.
    InvalidScaling {
        /// Name of the offending `LatticeScaling` field
        field: &'static str,
        /// Value it held
        value: f64,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Grid dimensions {width}x{height} are invalid: need width >= 2 and height >= 1"
            ),
            Self::InvalidViscosity(nu) => {
                write!(f, "Viscosity must be finite and positive, got {nu}")
            }
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "Grid shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::InvalidScaling { field, value } => {
                write!(f, "Scaling field {field} must be finite and positive, got {value}")
            }
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimError::InvalidDimensions {
            width: 1,
            height: 0,
        };
        assert_eq!(
            err.to_string(),
            "Grid dimensions 1x0 are invalid: need width >= 2 and height >= 1"
        );

        let err = SimError::DimensionMismatch {
            expected: (10, 5),
            actual: (5, 10),
        };
        assert_eq!(err.to_string(), "Grid shape mismatch: expected 10x5, got 5x10");

        let err = SimError::InvalidScaling {
            field: "lattice_speed",
            value: -0.5,
        };
        assert_eq!(
            err.to_string(),
            "Scaling field lattice_speed must be finite and positive, got -0.5"
        );
    }
}
