//! Tracer advection, wrapping and recycling

use airflow_sim_core::{
    CpuLbmSolver, FlowSolver, ObstacleGrid, ParticleAdvector, ParticleConfig, SolverConfig, Vec2,
};
use ctor::ctor;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const WIDTH: usize = 100;
const HEIGHT: usize = 50;

fn seeded_swarm(count: usize, seed: u64) -> ParticleAdvector {
    let config = ParticleConfig {
        count,
        ..ParticleConfig::default()
    };
    ParticleAdvector::with_rng(&config, WIDTH, HEIGHT, StdRng::seed_from_u64(seed))
}

fn uniform(u: Vec2) -> Vec<Vec2> {
    vec![u; WIDTH * HEIGHT]
}

#[test]
fn test_lane_layout_matches_height() {
    let swarm = seeded_swarm(1000, 1);
    assert_eq!(swarm.lanes().len(), HEIGHT / 9);
    assert_eq!(swarm.lanes().first().copied(), Some(2.0));
    assert_eq!(swarm.lanes().last().copied(), Some(48.0));
    assert_eq!(swarm.len(), 1000);
}

#[test]
fn test_out_of_bounds_particle_respawns_near_inlet() {
    let mut swarm = seeded_swarm(5, 11);
    let obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    swarm.positions_mut()[0] = Vec2::new(-5.0, 10.0);

    swarm.update(&uniform(Vec2::zeros()), &obstacles);

    let p = swarm.positions()[0];
    assert!(p.x >= 0.0 && p.x < 10.0, "respawn x {}", p.x);
    let lanes = [2.0, 13.5, 25.0, 36.5, 48.0];
    assert!(lanes.contains(&p.y), "respawn y {}", p.y);
}

#[test]
fn test_non_finite_particle_respawns() {
    let mut swarm = seeded_swarm(5, 12);
    let obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    swarm.positions_mut()[1] = Vec2::new(f32::NAN, 3.0);
    swarm.positions_mut()[2] = Vec2::new(4.0, f32::INFINITY);

    swarm.update(&uniform(Vec2::zeros()), &obstacles);

    for p in &swarm.positions()[1..3] {
        assert!(p.x.is_finite() && p.x < swarm.respawn_limit());
        assert!(swarm.lanes().contains(&p.y));
    }
}

#[test]
fn test_fluid_particle_moves_by_cell_velocity() {
    let mut swarm = seeded_swarm(5, 13);
    let obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    let mut velocity = uniform(Vec2::zeros());
    // Truncation picks cell (20, 30) for both positions below
    velocity[30 * WIDTH + 20] = Vec2::new(0.25, -0.5);
    swarm.positions_mut()[0] = Vec2::new(20.75, 30.25);
    swarm.positions_mut()[1] = Vec2::new(20.0, 30.5);

    swarm.update(&velocity, &obstacles);

    assert_eq!(swarm.positions()[0], Vec2::new(21.0, 29.75));
    assert_eq!(swarm.positions()[1], Vec2::new(20.25, 30.0));
}

#[test]
fn test_vertical_wrap() {
    let mut swarm = seeded_swarm(5, 14);
    let obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    swarm.positions_mut()[0] = Vec2::new(50.0, 49.5);
    swarm.positions_mut()[1] = Vec2::new(60.0, 0.25);

    let mut velocity = uniform(Vec2::zeros());
    velocity[49 * WIDTH + 50] = Vec2::new(0.0, 1.0);
    velocity[60] = Vec2::new(0.0, -0.75);
    swarm.update(&velocity, &obstacles);

    assert_eq!(swarm.positions()[0], Vec2::new(50.0, 0.5));
    assert_eq!(swarm.positions()[1], Vec2::new(60.0, 49.5));
}

#[test]
fn test_right_edge_exit_recycles_next_update() {
    let mut swarm = seeded_swarm(5, 15);
    let obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    let velocity = uniform(Vec2::new(1.0, 0.0));
    swarm.positions_mut()[0] = Vec2::new(99.5, 25.0);

    // x is not wrapped: the particle first leaves the grid
    swarm.update(&velocity, &obstacles);
    assert_eq!(swarm.positions()[0], Vec2::new(100.5, 25.0));

    swarm.update(&velocity, &obstacles);
    assert!(swarm.positions()[0].x < swarm.respawn_limit());
}

#[test]
fn test_particles_never_rest_on_obstacles() {
    let mut swarm = seeded_swarm(2000, 16);
    let mut obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    obstacles.fill_rect(40, 10, 60, 40);
    let velocity = uniform(Vec2::new(0.8, 0.0));

    let solid_indices = |swarm: &ParticleAdvector| -> Vec<usize> {
        swarm
            .positions()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x >= 0.0 && p.y >= 0.0)
            .filter(|(_, p)| obstacles.get_checked(p.x as i64, p.y as i64) == Some(true))
            .map(|(i, _)| i)
            .collect()
    };

    let mut entered = 0;
    for _ in 0..200 {
        let landed = solid_indices(&swarm);
        entered += landed.len();
        swarm.update(&velocity, &obstacles);
        // Particles that landed on a solid cell are recycled on the next update
        for i in landed {
            assert!(swarm.positions()[i].x < swarm.respawn_limit());
        }
    }
    assert!(entered > 0);

    for p in swarm.positions() {
        assert!(p.y >= 0.0 && p.y < HEIGHT as f32);
        assert!(p.x.is_finite());
    }
}

#[test]
fn test_seeded_swarms_agree() {
    let obstacles = ObstacleGrid::empty(WIDTH, HEIGHT);
    let velocity = uniform(Vec2::new(1.3, 0.4));
    let mut a = seeded_swarm(5000, 99);
    let mut b = seeded_swarm(5000, 99);
    for _ in 0..100 {
        a.update(&velocity, &obstacles);
        b.update(&velocity, &obstacles);
    }
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_advect_through_solver_field() {
    let mut solver = CpuLbmSolver::new(&SolverConfig {
        width: WIDTH,
        height: HEIGHT,
        viscosity: 0.02,
    })
    .unwrap();
    for _ in 0..200 {
        solver.set_inlet(0.1);
        solver.step();
    }

    let mut swarm = seeded_swarm(10, 17);
    swarm.positions_mut()[0] = Vec2::new(3.0, 25.0);
    let before = swarm.positions()[0];
    swarm.advect_with(&solver);

    let u = solver.velocity_at(3, 25);
    assert!(u.x > 0.0);
    assert_eq!(swarm.positions()[0], before + u);
}
