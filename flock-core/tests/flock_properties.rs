use flock_core::{
    BehaviorCoefficients, Boid, Bounds, FlockConfig, FlockController, NeighborSearch, UniformGrid,
    Vector3D,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const EPSILON: f32 = 1e-4;

fn only(coefficients: BehaviorCoefficients) -> FlockConfig {
    FlockConfig {
        coefficients,
        ..FlockConfig::default()
    }
}

fn still(x: f32, y: f32, z: f32) -> Boid {
    Boid::new(Vector3D::new(x, y, z), Vector3D::zero(), 1.0)
}

fn min_pair_gap(boids: &[Boid]) -> f32 {
    let mut gap = f32::INFINITY;
    for i in 0..boids.len() {
        for j in (i + 1)..boids.len() {
            let d = boids[i].position.distance(&boids[j].position);
            gap = gap.min(d - (boids[i].radius + boids[j].radius));
        }
    }
    gap
}

#[test]
fn test_positions_stay_inside_bounds_for_any_start() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let bounds = Bounds::cube(10.0);
    let boids: Vec<Boid> = (0..60)
        .map(|_| {
            Boid::new(
                Vector3D::new(
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                ),
                Vector3D::new(rng.gen_range(-5.0..5.0), 0.0, rng.gen_range(-5.0..5.0)),
                1.0,
            )
        })
        .collect();
    let config = FlockConfig {
        bounds,
        max_velocity: 5.0,
        ..FlockConfig::default()
    };
    let mut flock = FlockController::from_boids(boids, config, 1);

    for dt in [0.016, 0.5, 1.0, 3.0, 10.0] {
        flock.advance(dt);
        for boid in flock.boids() {
            assert!(bounds.contains(&boid.position), "{:?} escaped", boid.position);
        }
    }
}

#[test]
fn test_single_overlap_resolves_within_a_few_ticks() {
    let mut boids: Vec<Boid> = (0..5).map(|i| still(i as f32 * 3.0 - 6.0, 0.0, 0.0)).collect();
    boids[1].position = Vector3D::new(-5.5, 0.2, 0.0);

    let mut flock =
        FlockController::from_boids(boids, only(BehaviorCoefficients::zero()), 0);
    assert!(min_pair_gap(flock.boids()) < 0.0);

    for _ in 0..10 {
        flock.advance(1.0 / 60.0);
    }
    assert!(min_pair_gap(flock.boids()) >= -EPSILON);
}

#[test]
fn test_dense_cluster_converges() {
    let boids: Vec<Boid> = (0..8)
        .map(|i| still(0.1 * i as f32, 0.05 * (i % 3) as f32, -0.07 * (i % 2) as f32))
        .collect();
    let mut flock =
        FlockController::from_boids(boids, only(BehaviorCoefficients::zero()), 0);

    for _ in 0..200 {
        flock.advance(1.0 / 60.0);
    }
    assert!(min_pair_gap(flock.boids()) >= -0.01);
}

#[test]
fn test_add_remove_stack_symmetry() {
    let mut flock = FlockController::with_seed(12, FlockConfig::default(), 8);
    flock.advance(0.1);
    let before = flock.boids().to_vec();

    flock.add_one();
    let removed = flock.remove_one();

    assert!(removed.is_some());
    assert_eq!(flock.len(), before.len());
    assert_eq!(flock.boids(), before.as_slice());
}

#[test]
fn test_reset_to_zero_then_advance() {
    let mut flock = FlockController::with_seed(25, FlockConfig::default(), 8);
    flock.reset(0);
    assert!(flock.is_empty());
    flock.advance(1.0);
    assert!(flock.is_empty());
    assert_eq!(flock.centroid(), None);
    assert_eq!(flock.mean_speed(), 0.0);

    flock.reset(7);
    assert_eq!(flock.len(), 7);
}

#[test]
fn test_no_separation_keeps_overlapping_pair_still() {
    let config = FlockConfig {
        boid_collisions: false,
        ..only(BehaviorCoefficients::zero())
    };
    let mut flock = FlockController::from_boids(vec![still(0.0, 0.0, 0.0), still(0.5, 0.0, 0.0)], config, 0);

    for _ in 0..20 {
        flock.advance(0.1);
    }
    let d = flock.boids()[0].position.distance(&flock.boids()[1].position);
    assert!((d - 0.5).abs() < 1e-6);
}

#[test]
fn test_separation_scenario_two_boids() {
    let config = FlockConfig {
        max_velocity: 1000.0,
        ..only(BehaviorCoefficients::new(0.0, 0.0, 1.0))
    };
    let mut flock = FlockController::from_boids(vec![still(0.0, 0.0, 0.0), still(0.5, 0.0, 0.0)], config, 0);

    flock.advance(1.0);
    let after_one = flock.boids()[0].position.distance(&flock.boids()[1].position);
    assert!(after_one > 0.5);

    for _ in 0..10 {
        flock.advance(1.0);
    }
    let d = flock.boids()[0].position.distance(&flock.boids()[1].position);
    assert!(d >= 2.0 - EPSILON, "distance {}", d);
}

#[test]
fn test_separation_alone_pushes_apart_without_collision_pass() {
    let config = FlockConfig {
        max_velocity: 1000.0,
        boid_collisions: false,
        ..only(BehaviorCoefficients::new(0.0, 0.0, 1.0))
    };
    let mut flock = FlockController::from_boids(vec![still(0.0, 0.0, 0.0), still(0.5, 0.0, 0.0)], config, 0);

    for _ in 0..3 {
        flock.advance(1.0);
    }
    let d = flock.boids()[0].position.distance(&flock.boids()[1].position);
    assert!(d >= 2.0 - EPSILON, "distance {}", d);
}

#[test]
fn test_boundary_bounce_scenario() {
    let config = FlockConfig {
        bounds: Bounds::cube(10.0),
        ..only(BehaviorCoefficients::zero())
    };
    let boid = Boid::new(Vector3D::new(9.0, 9.0, 9.0), Vector3D::X, 1.0);
    let mut flock = FlockController::from_boids(vec![boid], config, 0);

    flock.advance(1.0);

    let boid = &flock.boids()[0];
    assert_eq!(boid.position.x, 9.0);
    assert!(boid.velocity.x <= 0.0);
    assert_eq!(boid.velocity.x, -1.0);
}

#[test]
fn test_grid_search_matches_brute_force_tick() {
    let config = FlockConfig::default();
    let mut brute = FlockController::with_seed(80, config, 17);
    let mut grid = FlockController::with_search(80, config, 17, UniformGrid::new(config.perception_radius));
    assert_eq!(brute.boids(), grid.boids());

    brute.advance(0.05);
    grid.advance(0.05);

    for (a, b) in brute.boids().iter().zip(grid.boids()) {
        assert!(a.position.distance(&b.position) < 1e-3);
    }
}

#[test]
fn test_custom_neighbor_search_is_used() {
    /// Reports no neighbors at all.
    struct Blind;

    impl NeighborSearch for Blind {
        fn rebuild(&mut self, _boids: &[Boid]) {}
        fn neighbors(&self, _boids: &[Boid], _index: usize, _radius: f32, _out: &mut Vec<usize>) {}
    }

    let config = FlockConfig {
        boid_collisions: true,
        ..only(BehaviorCoefficients::new(0.0, 0.0, 1.0))
    };
    let mut flock = FlockController::with_search(0, config, 0, Blind);
    flock.add_one();
    flock.add_one();
    let before = flock.boids().to_vec();
    flock.set_velocity_limit(0.0);
    flock.advance(1.0);

    // No neighbors means no separation and no contacts; zero speed means no motion.
    for (a, b) in before.iter().zip(flock.boids()) {
        assert_eq!(a.position, b.position);
    }
}
