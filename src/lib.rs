/*
 * Boid Flocking Core - Module Definitions
 *
 * This file defines the module structure of the flocking core: settings,
 * kinematic bodies, obstacle probes, steering behaviors, neighbor search, the
 * flock itself, and a fixed-timestep driver.
 */

// Re-export key components for easier access
pub use body::{BodyState, Boid, KinematicBody};
pub use boid::{integrate, BoidUpdate, Neighborhood, Steering, SteeringForces};
pub use debug::{DebugInfo, TickStats};
pub use error::{SettingsError, SettingsResult};
pub use flock::{BoidId, Flock};
pub use obstacle::{NoObstacles, ObstacleProbe, SphereObstacle, SphereObstacles};
pub use params::FlockSettings;
pub use sim::Simulation;
pub use spatial_grid::SpatialGrid;

// Define modules
pub mod body;
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod math;
pub mod obstacle;
pub mod params;
pub mod sim;
pub mod spatial_grid;

// Constants
pub const SPAWN_EXTENT: f32 = 2.0; // New boids spawn inside [-SPAWN_EXTENT, SPAWN_EXTENT]^3
pub const DEFAULT_TICK_RATE: f64 = 60.0;
pub const MAX_STEPS_PER_FRAME: usize = 8;
