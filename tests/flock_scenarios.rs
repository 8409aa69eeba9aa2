use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flock_sim::{
    BodyState, Boid, Flock, FlockSettings, Neighborhood, NoObstacles, SphereObstacles,
};

fn flock_at(settings: FlockSettings, positions: &[Vec3]) -> Flock {
    let mut flock: Flock = Flock::new(settings).unwrap();
    for &position in positions {
        flock.spawn(Boid::new(position));
    }
    flock
}

fn random_flock(settings: FlockSettings, count: usize, seed: u64) -> Flock {
    let mut flock: Flock = Flock::new(settings).unwrap();
    flock.initialize(count, &mut StdRng::seed_from_u64(seed));
    flock
}

fn snapshot(flock: &Flock) -> Vec<BodyState> {
    flock.neighbors().iter().map(BodyState::capture).collect()
}

#[test]
fn lone_boid_without_forces_keeps_min_speed_and_heading() {
    let settings = FlockSettings::default().without_steering();
    let mut flock = flock_at(settings.clone(), &[Vec3::ZERO]);
    let heading = flock.neighbors()[0].heading;

    for _ in 0..50 {
        flock.update(0.02, &NoObstacles);
        flock.advance(0.02);
    }

    let boid = flock.neighbors()[0];
    assert!((boid.speed() - settings.min_speed).abs() < 1e-5);
    assert!(boid.heading.abs_diff_eq(heading, 1e-6));

    // Too slow is lifted back to the minimum without turning
    flock.boids_mut()[0].velocity = heading * 0.1;
    flock.update(0.02, &NoObstacles);
    let boid = flock.neighbors()[0];
    assert!((boid.speed() - settings.min_speed).abs() < 1e-5);
    assert!(boid.heading.abs_diff_eq(heading, 1e-6));
}

#[test]
fn lone_boid_has_zero_cohesion_under_any_settings() {
    let boids = [BodyState { position: Vec3::new(5.0, -2.0, 1.0), velocity: Vec3::X, heading: Vec3::X }];
    for use_center in [true, false] {
        for radius in [0.0, 1.0, 1000.0] {
            let settings = FlockSettings {
                use_center_for_cohesion: use_center,
                cohesion_radius: radius,
                cohesion_weight: 3.0,
                ..Default::default()
            };
            let view = Neighborhood::new(&boids, boids[0].position, &settings);
            assert_eq!(view.cohesion(0), Vec3::ZERO);
        }
    }
}

#[test]
fn two_close_boids_push_directly_apart() {
    let settings = FlockSettings {
        separation_radius: 1.0,
        separation_weight: 1.0,
        ..FlockSettings::default().without_steering()
    };
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(0.3, 0.4, 0.0);
    let mut flock = flock_at(settings, &[a, b]);
    for boid in flock.boids_mut() {
        boid.velocity = Vec3::ZERO;
    }

    // With no prior velocity, the committed velocity is the acceleration direction
    flock.update(0.1, &NoObstacles);
    let away = (a - b).normalize();
    let v0 = flock.neighbors()[0].velocity.normalize();
    let v1 = flock.neighbors()[1].velocity.normalize();
    assert!(v0.abs_diff_eq(away, 1e-5));
    assert!(v1.abs_diff_eq(-away, 1e-5));
}

#[test]
fn center_cohesion_target_for_five_boids() {
    let positions = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(-1.0, 2.0, 0.0),
        Vec3::new(0.0, 0.0, 3.0),
        Vec3::new(2.0, -1.0, 1.0),
        Vec3::new(3.0, 4.0, -2.0),
    ];
    let mut flock = flock_at(FlockSettings::default(), &positions);
    let c = flock.recompute_centroid();

    let states = snapshot(&flock);
    let settings = flock.settings().clone();
    let view = Neighborhood::new(&states, c, &settings);
    for (i, &a) in positions.iter().enumerate() {
        let expected = (c * 5.0 - a) / 4.0;
        assert!(view.cohesion_target(i).unwrap().abs_diff_eq(expected, 1e-5));
        assert!(view.cohesion(i).abs_diff_eq(expected - a, 1e-5));
    }
}

#[test]
fn zero_time_tick_without_forces_is_identity() {
    let settings = FlockSettings::default().without_steering();
    let mut flock = random_flock(settings, 25, 11);
    let before = snapshot(&flock);

    flock.update(0.0, &NoObstacles);

    for (boid, old) in flock.neighbors().iter().zip(&before) {
        assert!(boid.velocity.abs_diff_eq(old.velocity, 1e-6));
        assert!(boid.heading.abs_diff_eq(old.heading, 1e-6));
        assert_eq!(boid.position, old.position);
    }
}

#[test]
fn speed_stays_in_range_for_any_tick() {
    let settings = FlockSettings {
        max_steer_force: 50.0,
        separation_weight: 4.0,
        alignment_weight: 2.0,
        ..Default::default()
    };
    let obstacles = SphereObstacles::new().with(Vec3::new(0.0, 0.0, 3.0), 1.0);
    let mut flock = random_flock(settings.clone(), 60, 5);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..100 {
        let dt = rng.gen_range(0.0..0.5);
        flock.update(dt, &obstacles);
        flock.advance(dt);
        for boid in flock.neighbors() {
            let speed = boid.speed();
            assert!(speed >= settings.min_speed - 1e-4, "speed {speed} below range");
            assert!(speed <= settings.max_speed + 1e-4, "speed {speed} above range");
            assert!(boid.heading.is_finite());
        }
    }
}

#[test]
fn spatial_grid_matches_brute_force() {
    for use_center in [true, false] {
        let brute = FlockSettings {
            use_center_for_cohesion: use_center,
            cohesion_radius: 1.5,
            ..Default::default()
        };
        let grid = FlockSettings { enable_spatial_grid: true, ..brute.clone() };

        let mut a = random_flock(brute, 150, 21);
        let mut b = random_flock(grid, 150, 21);
        for _ in 0..20 {
            a.update(0.05, &NoObstacles);
            a.advance(0.05);
            let stats = b.update(0.05, &NoObstacles);
            b.advance(0.05);
            assert!(stats.neighbor_checks <= 150 * 149);
        }

        for (x, y) in a.neighbors().iter().zip(b.neighbors()) {
            assert_eq!(x, y);
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    let sequential = FlockSettings::default();
    let parallel = FlockSettings { enable_parallel: true, ..sequential.clone() };

    let mut a = random_flock(sequential, 300, 8);
    let mut b = random_flock(parallel, 300, 8);
    for _ in 0..10 {
        a.update(0.016, &NoObstacles);
        a.advance(0.016);
        let stats = b.update(0.016, &NoObstacles);
        b.advance(0.016);
        assert!(stats.chunk_size.is_some());
    }

    assert_eq!(a.neighbors(), b.neighbors());
}

#[test]
fn boids_steer_away_from_an_obstacle_ahead() {
    let settings = FlockSettings {
        collision_avoidance_weight: 5.0,
        collision_avoidance_radius: 1.0,
        ..FlockSettings::default().without_steering()
    };
    let obstacles = SphereObstacles::new().with(Vec3::new(0.3, 0.0, 2.5), 1.0);
    let mut flock = flock_at(settings, &[Vec3::ZERO]);

    let stats = flock.update(0.1, &obstacles);
    assert_eq!(stats.obstacle_hits, 1);

    // Pushed back and to the side away from the obstacle's offset center
    let v = flock.neighbors()[0].velocity;
    assert!(v.z < 1.0);
    assert!(v.x < 0.0);
}

#[test]
fn contact_at_the_boid_position_is_counted_as_a_hit() {
    let mut flock = random_flock(FlockSettings::default(), 12, 4);
    let touching = |origin: Vec3, _: Vec3, _: f32, _: f32| Some(origin);

    let stats = flock.update(0.016, &touching);
    assert_eq!(stats.obstacle_hits, 12);
    assert_eq!(flock.update(0.016, &NoObstacles).obstacle_hits, 0);
}

#[test]
fn parallel_grid_matches_sequential_brute_force() {
    let brute = FlockSettings { use_center_for_cohesion: false, ..Default::default() };
    let grid_parallel = FlockSettings { enable_spatial_grid: true, enable_parallel: true, ..brute.clone() };

    let mut a = random_flock(brute, 200, 17);
    let mut b = random_flock(grid_parallel, 200, 17);
    for _ in 0..10 {
        a.update(0.02, &NoObstacles);
        a.advance(0.02);
        b.update(0.02, &NoObstacles);
        b.advance(0.02);
    }

    assert_eq!(a.neighbors(), b.neighbors());
}
