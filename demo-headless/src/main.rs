use airflow_sim_core::{
    LatticeScaling, ParticleConfig, QualityPreset, SmoothedForces, SolverConfig, StepMetrics,
    TunnelConfig, WindTunnel, MAX_STABLE_LATTICE_SPEED,
};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Headless wind tunnel run with configurable airfoil and flow
#[derive(Parser, Debug)]
#[command(name = "airflow-demo")]
#[command(about = "2D lattice-Boltzmann wind tunnel around a NACA airfoil", long_about = None)]
struct Args {
    /// Grid resolution (low, medium, high)
    #[arg(short, long, default_value = "medium")]
    quality: String,

    /// Kinematic viscosity in lattice units
    #[arg(long, default_value_t = 0.015)]
    viscosity: f32,

    /// NACA 4-digit airfoil code
    #[arg(short, long, default_value = "2412")]
    naca: String,

    /// Angle of attack in degrees
    #[arg(short, long, default_value_t = 5.0)]
    angle: f32,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Solver steps per frame
    #[arg(long, default_value_t = 4)]
    substeps: u32,

    /// Inlet speed to ramp towards, in lattice units
    #[arg(long, default_value_t = 0.1)]
    target_speed: f32,

    /// Inlet speed increase per solver step
    #[arg(long, default_value_t = 0.001)]
    ramp_rate: f32,

    /// Number of tracer particles
    #[arg(short, long, default_value_t = 20_000)]
    particles: usize,

    /// Seed for the tracer swarm (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Weight of each solver step in the reported drag/lift average
    #[arg(long, default_value_t = 0.005)]
    smoothing: f64,

    /// Frames between force reports
    #[arg(short, long, default_value_t = 50)]
    report_every: u32,
}

fn parse_quality(name: &str) -> QualityPreset {
    match name.to_lowercase().as_str() {
        "low" => QualityPreset::Low,
        "medium" => QualityPreset::Medium,
        "high" => QualityPreset::High,
        _ => {
            warn!("Unknown quality '{}', using medium", name);
            QualityPreset::Medium
        }
    }
}

fn report(
    frame: u32,
    inlet: f32,
    metrics: &StepMetrics,
    smoothed: SmoothedForces,
    scaling: &LatticeScaling,
) {
    let forces = scaling.to_physical(smoothed.drag, smoothed.lift);
    println!(
        "Frame {:5}: wind {:5.1} m/s | drag {:9.3} N | lift {:9.3} N | peak |u| {:.4}",
        frame,
        *scaling.wind_speed(inlet),
        *forces.drag,
        *forces.lift,
        metrics.peak_speed
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    println!("=== Airflow Wind Tunnel Demo ===\n");

    let quality = parse_quality(&args.quality);
    let config = TunnelConfig {
        solver: SolverConfig::from_preset(quality, args.viscosity),
        particles: ParticleConfig {
            count: args.particles,
            seed: args.seed,
            ..ParticleConfig::default()
        },
        substeps_per_frame: args.substeps,
        force_smoothing: args.smoothing,
        ..TunnelConfig::default()
    };

    let mut tunnel = match WindTunnel::new(&config) {
        Ok(tunnel) => tunnel,
        Err(e) => {
            error!("Cannot build wind tunnel: {}", e);
            std::process::exit(1);
        }
    };

    let solid = tunnel.place_airfoil(&args.naca, args.angle);
    let (width, height) = (config.solver.width, config.solver.height);
    let scaling = LatticeScaling::for_height(height);
    println!(
        "Grid {}x{} ({:?}), NACA {} at {:.1}° covering {} cells",
        width, height, quality, args.naca, args.angle, solid
    );
    println!(
        "Cell size {:.2} mm, time step {:.3} µs, viscosity {}\n",
        *scaling.dx() * 1000.0,
        *scaling.dt() * 1.0e6,
        args.viscosity
    );

    if args.target_speed > MAX_STABLE_LATTICE_SPEED as f32 {
        warn!(
            "Target inlet speed {} exceeds the stable lattice bound {}",
            args.target_speed, MAX_STABLE_LATTICE_SPEED
        );
    }

    // One inlet value per frame, so the per-step ramp is applied per frame in bulk
    let ramp_per_frame = args.ramp_rate * args.substeps as f32;
    let report_every = args.report_every.max(1);
    let mut inlet = 0.0_f32;
    let mut diverged = false;

    for frame in 1..=args.frames {
        inlet = (inlet + ramp_per_frame).min(args.target_speed);
        let metrics = tunnel.advance_frame(inlet);

        let unstable =
            metrics.peak_speed.is_nan() || metrics.peak_speed > MAX_STABLE_LATTICE_SPEED;
        if unstable && !diverged {
            warn!(
                "Frame {}: peak speed {:.3} exceeds the stable lattice bound, the flow is diverging",
                frame, metrics.peak_speed
            );
            diverged = true;
        }

        if frame % report_every == 0 || frame == args.frames {
            report(frame, inlet, &metrics, tunnel.smoothed_forces(), &scaling);
        }
    }

    info!(
        "Finished {} frames with {} tracers",
        args.frames,
        tunnel.particles().len()
    );
}
