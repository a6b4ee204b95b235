//! Grid storage and obstacle generation

pub mod airfoil;
pub mod field;
pub mod obstacle;

// Re-export main types
pub use airfoil::{generate_profile, stamp, AirfoilProfile, Naca4};
pub use field::FieldData;
pub use obstacle::ObstacleGrid;
