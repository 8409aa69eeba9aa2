/*
 * Boid Steering Module
 *
 * Each boid combines four steering behaviors into one acceleration:
 * 1. Cohesion: steer towards the flock center (or the local neighbor center)
 * 2. Separation: steer away from neighbors that are too close
 * 3. Alignment: steer towards the headings of nearby neighbors
 * 4. Collision avoidance: steer back from obstacles found ahead
 *
 * Every force is computed from a read-only snapshot of the flock taken at the
 * start of the tick, clamped to the steering ceiling, weighted, and summed.
 * The resulting velocity is kept inside the speed range and the heading
 * follows the velocity.
 */

use glam::Vec3;

use crate::body::BodyState;
use crate::math::{clamp_magnitude, clamp_speed};
use crate::obstacle::ObstacleProbe;
use crate::params::FlockSettings;
use crate::spatial_grid::SpatialGrid;

// The four raw (or clamped) steering forces acting on one boid
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteeringForces {
    pub cohesion: Vec3,
    pub separation: Vec3,
    pub alignment: Vec3,
    pub collision_avoidance: Vec3,
}

impl SteeringForces {
    pub fn clamped(self, max_steer_force: f32) -> Self {
        Self {
            cohesion: clamp_magnitude(self.cohesion, max_steer_force),
            separation: clamp_magnitude(self.separation, max_steer_force),
            alignment: clamp_magnitude(self.alignment, max_steer_force),
            collision_avoidance: clamp_magnitude(self.collision_avoidance, max_steer_force),
        }
    }

    // Clamp each force, weight it, and sum into an acceleration
    pub fn acceleration(self, settings: &FlockSettings) -> Vec3 {
        let clamped = self.clamped(settings.max_steer_force);
        clamped.cohesion * settings.cohesion_weight
            + clamped.separation * settings.separation_weight
            + clamped.alignment * settings.alignment_weight
            + clamped.collision_avoidance * settings.collision_avoidance_weight
    }
}

// Raw forces for one boid plus what it cost to find them
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    pub forces: SteeringForces,
    pub neighbor_checks: usize,
    pub obstacle_hit: bool,
}

// New kinematic state for one boid, ready to be committed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoidUpdate {
    pub velocity: Vec3,
    pub heading: Vec3,
    pub neighbor_checks: usize,
    pub obstacle_hit: bool,
}

// Everything a boid may read during a tick
#[derive(Clone, Copy)]
pub struct Neighborhood<'a> {
    pub boids: &'a [BodyState],
    pub centroid: Vec3,
    pub settings: &'a FlockSettings,
    pub grid: Option<&'a SpatialGrid>,
}

impl<'a> Neighborhood<'a> {
    pub fn new(boids: &'a [BodyState], centroid: Vec3, settings: &'a FlockSettings) -> Self {
        Self { boids, centroid, settings, grid: None }
    }

    pub fn with_grid(self, grid: &'a SpatialGrid) -> Self {
        Self { grid: Some(grid), ..self }
    }

    // Visit every other boid within `radius` (inclusive) of boid `index`, in
    // ascending index order. Returns how many candidates were distance-tested.
    // `nearby` is scratch space for grid queries and is overwritten.
    fn for_each_neighbor(
        &self,
        index: usize,
        radius: f32,
        nearby: &mut Vec<usize>,
        mut visit: impl FnMut(&BodyState, f32),
    ) -> usize {
        let me = self.boids[index].position;
        let mut checks = 0;

        let mut test = |other_index: usize| {
            // Self is excluded by identity, never by distance
            if other_index == index {
                return;
            }
            checks += 1;

            let other = &self.boids[other_index];
            let d = me.distance(other.position);
            if d <= radius {
                visit(other, d);
            }
        };

        match self.grid {
            Some(grid) => {
                grid.get_nearby_indices(me, radius, nearby);
                nearby.iter().copied().for_each(&mut test);
            }
            None => (0..self.boids.len()).for_each(&mut test),
        }

        checks
    }

    // The point boid `index` is pulled towards. Center mode uses the centroid
    // minus the boid's own contribution; local mode the mean of the others in
    // range.
    pub fn cohesion_target(&self, index: usize) -> Option<Vec3> {
        let count = self.boids.len();
        if count <= 1 {
            return None;
        }

        let position = self.boids[index].position;
        if self.settings.use_center_for_cohesion {
            let n = count as f32;
            return Some((self.centroid * n - position) / (n - 1.0));
        }

        let mut sum = Vec3::ZERO;
        let mut neighbors = 0;
        self.for_each_neighbor(index, self.settings.cohesion_radius, &mut Vec::new(), |other, _| {
            sum += other.position;
            neighbors += 1;
        });

        (neighbors > 0).then(|| sum / neighbors as f32)
    }

    pub fn cohesion(&self, index: usize) -> Vec3 {
        match self.cohesion_target(index) {
            Some(target) if self.settings.use_center_for_cohesion => target - self.boids[index].position,
            // The local-neighbor mode steers by the plain neighbor mean
            Some(mean) => mean,
            None => Vec3::ZERO,
        }
    }

    pub fn separation(&self, index: usize) -> Vec3 {
        let position = self.boids[index].position;
        let mut steering = Vec3::ZERO;
        self.for_each_neighbor(index, self.settings.separation_radius, &mut Vec::new(), |other, _| {
            steering += position - other.position;
        });
        steering
    }

    pub fn alignment(&self, index: usize) -> Vec3 {
        let mut steering = Vec3::ZERO;
        self.for_each_neighbor(index, self.settings.alignment_radius, &mut Vec::new(), |other, _| {
            steering += other.heading;
        });
        steering
    }

    // Where the sweep ahead of boid `index` touches an obstacle, if anywhere
    pub fn obstacle_contact<P: ObstacleProbe + ?Sized>(&self, index: usize, probe: &P) -> Option<Vec3> {
        let boid = &self.boids[index];
        let radius = self.settings.collision_avoidance_radius;
        probe.cast_ahead(boid.position, boid.heading, radius, radius)
    }

    pub fn collision_avoidance<P: ObstacleProbe + ?Sized>(&self, index: usize, probe: &P) -> Vec3 {
        self.obstacle_contact(index, probe)
            .map_or(Vec3::ZERO, |hit| self.boids[index].position - hit)
    }

    // All four raw forces for boid `index`. The boid-to-boid behaviors are
    // gathered in a single pass over the neighbors.
    pub fn steering_forces<P: ObstacleProbe + ?Sized>(
        &self,
        index: usize,
        probe: &P,
        nearby: &mut Vec<usize>,
    ) -> Steering {
        let settings = self.settings;
        let position = self.boids[index].position;
        let local_cohesion = !settings.use_center_for_cohesion;

        let mut cohesion_sum = Vec3::ZERO;
        let mut cohesion_count = 0;
        let mut separation = Vec3::ZERO;
        let mut alignment = Vec3::ZERO;

        let neighbor_checks = self.for_each_neighbor(index, settings.max_neighbor_radius(), nearby, |other, d| {
            if local_cohesion && d <= settings.cohesion_radius {
                cohesion_sum += other.position;
                cohesion_count += 1;
            }
            if d <= settings.separation_radius {
                separation += position - other.position;
            }
            if d <= settings.alignment_radius {
                alignment += other.heading;
            }
        });

        let cohesion = if local_cohesion {
            if self.boids.len() > 1 && cohesion_count > 0 {
                cohesion_sum / cohesion_count as f32
            } else {
                Vec3::ZERO
            }
        } else {
            self.cohesion(index)
        };

        let contact = self.obstacle_contact(index, probe);
        Steering {
            forces: SteeringForces {
                cohesion,
                separation,
                alignment,
                collision_avoidance: contact.map_or(Vec3::ZERO, |hit| position - hit),
            },
            neighbor_checks,
            obstacle_hit: contact.is_some(),
        }
    }

    // Velocity and heading of boid `index` after `delta_time`. Callers stepping
    // many boids should hand in the same `nearby` buffer each time.
    pub fn step<P: ObstacleProbe + ?Sized>(
        &self,
        index: usize,
        probe: &P,
        delta_time: f32,
        nearby: &mut Vec<usize>,
    ) -> BoidUpdate {
        let steering = self.steering_forces(index, probe, nearby);
        let acceleration = steering.forces.acceleration(self.settings);
        let (velocity, heading) = integrate(&self.boids[index], acceleration, delta_time, self.settings);

        BoidUpdate {
            velocity,
            heading,
            neighbor_checks: steering.neighbor_checks,
            obstacle_hit: steering.obstacle_hit,
        }
    }
}

// Apply `acceleration` for `delta_time`, keep the speed inside the configured
// range, and point the heading along the result.
pub fn integrate(state: &BodyState, acceleration: Vec3, delta_time: f32, settings: &FlockSettings) -> (Vec3, Vec3) {
    let delta_time = delta_time.max(0.0);
    let velocity = state.velocity + acceleration * delta_time;
    let velocity = clamp_speed(velocity, settings.min_speed, settings.max_speed, state.heading);
    (velocity, velocity.normalize_or_zero())
}
