//! Airflow Simulation Core Library
//!
//! A 2D wind tunnel built on the lattice-Boltzmann method. Models
//! incompressible-like flow around a NACA 4-digit airfoil, measures drag and lift by
//! momentum exchange, and carries tracer particles through the flow for streamline
//! visualization.
//!
//! ## Components
//!
//! - `grid::airfoil`: airfoil geometry and rasterization into an obstacle grid
//! - `solver`: D2Q9 BGK fluid solver with bounce-back obstacles
//! - `particles`: recycled tracer swarm advected through the velocity field
//! - `simulation`: per-frame composition of the above

// Core types and utilities
pub mod core_types;
pub mod error;

pub mod grid;
pub mod particles;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{LatticeScaling, PhysicalForces, Vec2, MAX_STABLE_LATTICE_SPEED};
pub use error::SimError;

pub use grid::{AirfoilProfile, FieldData, Naca4, ObstacleGrid};
pub use particles::{ParticleAdvector, ParticleConfig};
pub use simulation::{TunnelConfig, WindTunnel};
pub use solver::{
    CpuLbmSolver, FlowSolver, QualityPreset, SmoothedForces, SolverConfig, StepMetrics,
};
