/*
 * Flock Module
 *
 * The Flock owns its boids and their shared settings. Each tick it:
 * 1. Captures a read-only snapshot of every body
 * 2. Recomputes the flock centroid from that snapshot
 * 3. Optionally buckets the snapshot into a spatial grid
 * 4. Computes every boid's new velocity and heading (in parallel if enabled)
 * 5. Commits all updates once every boid has been computed
 *
 * No boid can observe another boid's post-tick state within the same tick, so
 * parallel and sequential runs produce the same result.
 */

use std::f32::consts::TAU;
use std::time::Instant;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::body::{BodyState, Boid, KinematicBody};
use crate::boid::{BoidUpdate, Neighborhood};
use crate::debug::TickStats;
use crate::error::SettingsResult;
use crate::math::FORWARD;
use crate::obstacle::ObstacleProbe;
use crate::params::FlockSettings;
use crate::spatial_grid::SpatialGrid;
use crate::SPAWN_EXTENT;

// Handle to a boid inside its flock. It stays valid until the flock is
// cleared or re-initialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoidId(pub usize);

pub struct Flock<B = Boid> {
    boids: Vec<B>,
    centroid: Vec3,
    settings: FlockSettings,
    spatial_grid: SpatialGrid,
    snapshot: Vec<BodyState>,
}

impl<B: KinematicBody> Flock<B> {
    pub fn new(settings: FlockSettings) -> SettingsResult<Self> {
        settings.validate()?;
        let spatial_grid = SpatialGrid::new(settings.max_neighbor_radius());
        Ok(Self {
            boids: Vec::new(),
            centroid: Vec3::ZERO,
            settings,
            spatial_grid,
            snapshot: Vec::new(),
        })
    }

    pub fn settings(&self) -> &FlockSettings {
        &self.settings
    }

    // Replace the settings between ticks. Invalid settings leave the current
    // ones in place.
    pub fn set_settings(&mut self, settings: FlockSettings) -> SettingsResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    // Every live boid. Filtering out the querying boid is left to the
    // individual behaviors.
    pub fn neighbors(&self) -> &[B] {
        &self.boids
    }

    pub fn boids_mut(&mut self) -> &mut [B] {
        &mut self.boids
    }

    pub fn ids(&self) -> impl Iterator<Item = BoidId> {
        (0..self.boids.len()).map(BoidId)
    }

    pub fn get(&self, id: BoidId) -> Option<&B> {
        self.boids.get(id.0)
    }

    pub fn get_mut(&mut self, id: BoidId) -> Option<&mut B> {
        self.boids.get_mut(id.0)
    }

    pub fn centroid(&self) -> Vec3 {
        self.centroid
    }

    // Mean position of every live boid; the zero vector for an empty flock.
    pub fn recompute_centroid(&mut self) -> Vec3 {
        self.centroid = if self.boids.is_empty() {
            Vec3::ZERO
        } else {
            let sum: Vec3 = self.boids.iter().map(|boid| boid.position()).sum();
            sum / self.boids.len() as f32
        };
        self.centroid
    }

    // Adopt `body`, launching it along its heading at the minimum speed.
    pub fn spawn(&mut self, mut body: B) -> BoidId {
        let forward = body.heading().try_normalize().unwrap_or(FORWARD);
        body.set_heading(forward);
        body.set_velocity(forward * self.settings.min_speed);

        self.boids.push(body);
        BoidId(self.boids.len() - 1)
    }

    pub fn clear(&mut self) {
        debug!(boids = self.boids.len(), "clearing flock");
        self.boids.clear();
        self.snapshot.clear();
        self.centroid = Vec3::ZERO;
    }

    // Replace the flock with `count` boids built by `make`, each placed
    // uniformly at random inside the spawn cube with a random orientation.
    pub fn initialize_with<R, F>(&mut self, count: usize, rng: &mut R, mut make: F)
    where
        R: Rng + ?Sized,
        F: FnMut(Vec3) -> B,
    {
        self.clear();
        self.boids.reserve(count);

        for _ in 0..count {
            let position = Vec3::new(
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
            );
            let orientation = Quat::from_euler(
                EulerRot::YXZ,
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            );

            let mut body = make(position);
            body.set_heading(orientation * FORWARD);
            self.spawn(body);
        }

        self.recompute_centroid();
        debug!(boids = count, "flock initialized");
    }

    // Advance every boid's velocity and heading by one tick of `delta_time`
    // seconds.
    pub fn update<P: ObstacleProbe + ?Sized>(&mut self, delta_time: f32, probe: &P) -> TickStats {
        let started = Instant::now();

        self.snapshot.clear();
        self.snapshot.extend(self.boids.iter().map(BodyState::capture));
        self.recompute_centroid();

        let use_grid = self.settings.enable_spatial_grid;
        if use_grid {
            self.spatial_grid.rebuild(
                self.settings.max_neighbor_radius(),
                self.snapshot.iter().map(|state| state.position),
            );
        }

        let mut view = Neighborhood::new(&self.snapshot, self.centroid, &self.settings);
        if use_grid {
            view = view.with_grid(&self.spatial_grid);
        }

        let count = self.snapshot.len();
        let (updates, chunk_size): (Vec<BoidUpdate>, Option<usize>) = if self.settings.enable_parallel {
            let chunk_size = std::cmp::max(count / rayon::current_num_threads(), 1);
            let updates = (0..count)
                .into_par_iter()
                .with_min_len(chunk_size)
                // One grid query buffer per worker split
                .map_init(Vec::new, |nearby, i| view.step(i, probe, delta_time, nearby))
                .collect();
            (updates, Some(chunk_size))
        } else {
            let mut nearby = Vec::new();
            let updates = (0..count).map(|i| view.step(i, probe, delta_time, &mut nearby)).collect();
            (updates, None)
        };

        let mut stats = TickStats {
            boids: count,
            chunk_size,
            ..Default::default()
        };
        for (body, update) in self.boids.iter_mut().zip(&updates) {
            body.set_velocity(update.velocity);
            body.set_heading(update.heading);
            stats.neighbor_checks += update.neighbor_checks;
            stats.obstacle_hits += usize::from(update.obstacle_hit);
        }
        stats.compute_time = started.elapsed();

        trace!(
            boids = stats.boids,
            neighbor_checks = stats.neighbor_checks,
            obstacle_hits = stats.obstacle_hits,
            "flock tick"
        );
        stats
    }
}

impl Flock<Boid> {
    // Replace the flock with `count` in-memory boids.
    pub fn initialize<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.initialize_with(count, rng, Boid::new);
    }

    pub fn advance(&mut self, delta_time: f32) {
        for boid in &mut self.boids {
            boid.advance(delta_time);
        }
    }
}
