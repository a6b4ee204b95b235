//! Vector type alias for 2D positions and velocities.

use nalgebra::Vector2;

/// 2D vector type for lattice velocities and particle positions.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used throughout
/// the simulation for cell velocities, airfoil outline points, and tracer positions.
pub type Vec2 = Vector2<f32>;
