//! Lattice-Boltzmann flow solver module
//!
//! This module provides the D2Q9 fluid engine behind a backend-agnostic
//! `FlowSolver` trait. The CPU backend runs every kernel as a Rayon parallel-for
//! over grid rows.
//!
//! # Example
//!
//! ```rust
//! use airflow_sim_core::solver::{create_flow_solver, FlowSolver, SolverConfig};
//!
//! let config = SolverConfig { width: 64, height: 32, viscosity: 0.02 };
//! let mut solver = create_flow_solver(&config).unwrap();
//! solver.set_inlet(0.05);
//! let metrics = solver.step();
//! assert!(metrics.peak_speed > 0.0);
//! ```

mod config;
mod cpu;
pub mod lattice;
mod metrics;
mod quality;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use config::SolverConfig;
pub use cpu::CpuLbmSolver;
pub use metrics::{SmoothedForces, StepMetrics};
pub use quality::QualityPreset;
pub use r#trait::FlowSolver;

use crate::error::SimError;
use tracing::info;

/// Create a flow solver with automatic backend selection
///
/// Only the CPU backend exists today; the boxed trait object keeps callers independent
/// of that choice.
///
/// # Errors
///
/// Returns an error if the configuration is rejected by [`SolverConfig::validate`].
pub fn create_flow_solver(config: &SolverConfig) -> Result<Box<dyn FlowSolver>, SimError> {
    info!(
        "Using CPU backend ({} rayon threads)",
        rayon::current_num_threads()
    );
    Ok(Box::new(CpuLbmSolver::new(config)?))
}
