/*
 * Obstacle Probe Module
 *
 * Collision avoidance asks the host world a single question: sweeping a
 * sphere of a given radius along a direction, what is the first thing it
 * touches? Hosts answer through the ObstacleProbe trait. Two probes ship with
 * the crate: an empty world and a field of static spheres.
 */

use glam::Vec3;

pub trait ObstacleProbe: Sync {
    // Sweep a sphere of `radius` from `origin` along `direction` for at most
    // `max_distance`, returning the contact point of the first hit.
    fn cast_ahead(&self, origin: Vec3, direction: Vec3, radius: f32, max_distance: f32) -> Option<Vec3>;
}

impl<F> ObstacleProbe for F
where
    F: Fn(Vec3, Vec3, f32, f32) -> Option<Vec3> + Sync,
{
    fn cast_ahead(&self, origin: Vec3, direction: Vec3, radius: f32, max_distance: f32) -> Option<Vec3> {
        self(origin, direction, radius, max_distance)
    }
}

// Open sky: nothing is ever hit.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl ObstacleProbe for NoObstacles {
    fn cast_ahead(&self, _origin: Vec3, _direction: Vec3, _radius: f32, _max_distance: f32) -> Option<Vec3> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
}

// A set of static spheres tested analytically.
#[derive(Clone, Debug, Default)]
pub struct SphereObstacles {
    spheres: Vec<SphereObstacle>,
}

impl SphereObstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, center: Vec3, radius: f32) -> Self {
        self.push(center, radius);
        self
    }

    pub fn push(&mut self, center: Vec3, radius: f32) {
        self.spheres.push(SphereObstacle { center, radius: radius.max(0.0) });
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    // Distance along the ray at which the swept sphere first touches `sphere`.
    // Spheres already overlapping the probe at its origin are not reported.
    fn sweep_distance(sphere: &SphereObstacle, origin: Vec3, direction: Vec3, radius: f32) -> Option<f32> {
        let reach = sphere.radius + radius;
        let to_origin = origin - sphere.center;
        let c = to_origin.length_squared() - reach * reach;
        if c < 0.0 {
            return None;
        }

        let b = to_origin.dot(direction);
        if b > 0.0 {
            // Moving away from the sphere
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        Some(-b - discriminant.sqrt())
    }
}

impl ObstacleProbe for SphereObstacles {
    fn cast_ahead(&self, origin: Vec3, direction: Vec3, radius: f32, max_distance: f32) -> Option<Vec3> {
        let direction = direction.try_normalize()?;

        let mut nearest: Option<(f32, &SphereObstacle)> = None;
        for sphere in &self.spheres {
            if let Some(t) = Self::sweep_distance(sphere, origin, direction, radius) {
                if t <= max_distance && nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, sphere));
                }
            }
        }

        nearest.map(|(t, sphere)| {
            let probe_center = origin + direction * t;
            let normal = (probe_center - sphere.center).normalize_or_zero();
            sphere.center + normal * sphere.radius
        })
    }
}
