//! End-to-end frames: airfoil placement, solver sub-steps, tracers and unit conversion

use airflow_sim_core::{
    FlowSolver, LatticeScaling, ParticleConfig, SmoothedForces, SolverConfig, StepMetrics,
    TunnelConfig, WindTunnel,
};
use ctor::ctor;

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tunnel() -> WindTunnel {
    WindTunnel::new(&TunnelConfig {
        solver: SolverConfig {
            width: 120,
            height: 50,
            viscosity: 0.04,
        },
        particles: ParticleConfig {
            count: 500,
            seed: Some(42),
            ..ParticleConfig::default()
        },
        substeps_per_frame: 4,
        chord_fraction: 0.25,
        ..TunnelConfig::default()
    })
    .expect("valid tunnel config")
}

/// Average metrics over the last `window` frames of `frames`
fn run(tunnel: &mut WindTunnel, frames: usize, window: usize, inlet: f32) -> StepMetrics {
    let mut mean = StepMetrics::default();
    for frame in 0..frames {
        let metrics = tunnel.advance_frame(inlet);
        if frame + window >= frames {
            mean.drag += metrics.drag / window as f64;
            mean.lift += metrics.lift / window as f64;
            mean.peak_speed = mean.peak_speed.max(metrics.peak_speed);
        }
    }
    mean
}

#[test]
fn test_inclined_airfoil_lift_follows_angle() {
    let mut up = tunnel();
    up.place_airfoil("0012", 10.0);
    let nose_up = run(&mut up, 375, 75, 0.08);

    let mut down = tunnel();
    down.place_airfoil("0012", -10.0);
    let nose_down = run(&mut down, 375, 75, 0.08);

    assert!(nose_up.drag > 0.0 && nose_down.drag > 0.0);
    // Grid y grows downward, so upward lift is negative in lattice units
    assert!(nose_up.lift < 0.0, "lift {}", nose_up.lift);
    assert!(nose_down.lift > 0.0, "lift {}", nose_down.lift);

    let ratio = -nose_up.lift / nose_down.lift;
    assert!((0.5..2.0).contains(&ratio), "asymmetric lift ratio {ratio}");

    let scaling = LatticeScaling::for_height(50);
    let forces = scaling.to_physical(nose_up.drag, nose_up.lift);
    assert!(*forces.drag > 0.0);
    assert!(*forces.lift > 0.0);
}

#[test]
fn test_reset_returns_to_rest_and_keeps_airfoil() {
    let mut tunnel = tunnel();
    let solid = tunnel.place_airfoil("2412", 5.0);
    run(&mut tunnel, 20, 1, 0.08);

    assert!(tunnel.smoothed_forces().drag != 0.0);

    tunnel.reset(false);
    assert_eq!(tunnel.smoothed_forces(), SmoothedForces::default());
    assert_eq!(tunnel.solver().obstacles().solid_count(), solid);
    assert!(tunnel.solver().read_velocity().iter().all(|u| u.norm() == 0.0));
    assert!(tunnel.solver().read_density().iter().all(|&rho| rho == 1.0));

    tunnel.reset(true);
    assert_eq!(tunnel.solver().obstacles().solid_count(), 0);
}

#[test]
fn test_tracers_stay_off_airfoil_and_inside_rows() {
    let mut tunnel = tunnel();
    tunnel.place_airfoil("4412", 8.0);
    for _ in 0..100 {
        tunnel.advance_frame(0.08);
        for p in tunnel.particles().positions() {
            assert!(p.y >= 0.0 && p.y < 50.0, "tracer row {}", p.y);
        }
    }
    assert_eq!(tunnel.particles().len(), 500);
}

#[test]
fn test_frame_is_substeps_of_solver() {
    let mut framed = tunnel();
    let mut stepped = tunnel();
    framed.place_airfoil("0012", 0.0);
    stepped.place_airfoil("0012", 0.0);

    framed.advance_frame(0.05);
    for _ in 0..4 {
        let solver = stepped.solver_mut();
        solver.set_inlet(0.05);
        solver.step();
    }

    assert_eq!(
        framed.solver().read_velocity().to_vec(),
        stepped.solver().read_velocity().to_vec()
    );
}
