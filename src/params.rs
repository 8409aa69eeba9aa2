/*
 * Flock Settings Module
 *
 * This module defines the FlockSettings struct that contains all the tunable
 * parameters shared by every boid of a flock: speed bounds, the steering force
 * ceiling, and a weight and radius for each of the four steering behaviors.
 *
 * Settings are validated when a flock is built or a file is loaded. The flock
 * only hands out a mutable borrow between ticks, so every boid of a tick reads
 * the same values.
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockSettings {
    // General
    pub show_center: bool,
    pub initial_boid_count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_steer_force: f32,

    // Cohesion
    pub cohesion_weight: f32,
    pub use_center_for_cohesion: bool,
    pub cohesion_radius: f32,

    // Separation
    pub separation_weight: f32,
    pub separation_radius: f32,

    // Alignment
    pub alignment_weight: f32,
    pub alignment_radius: f32,

    // Collision avoidance
    pub collision_avoidance_weight: f32,
    pub collision_avoidance_radius: f32,

    // Performance settings
    pub enable_spatial_grid: bool,
    pub enable_parallel: bool,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            show_center: false,
            initial_boid_count: 50,
            min_speed: 1.0,
            max_speed: 2.5,
            max_steer_force: 1.5,
            cohesion_weight: 1.0,
            use_center_for_cohesion: true,
            cohesion_radius: 4.0,
            separation_weight: 1.0,
            separation_radius: 1.0,
            alignment_weight: 1.0,
            alignment_radius: 2.0,
            collision_avoidance_weight: 5.0,
            collision_avoidance_radius: 1.0,
            // Brute force, single threaded by default
            enable_spatial_grid: false,
            enable_parallel: false,
        }
    }
}

impl FlockSettings {
    /// Parse a settings record from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let settings: FlockSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject records the simulation cannot honor: non-positive minimum speed,
    /// an inverted speed range, or any negative / non-finite weight or radius.
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.min_speed > 0.0 && self.min_speed.is_finite()) {
            return Err(SettingsError::NonPositiveMinSpeed(self.min_speed));
        }
        if !self.max_speed.is_finite() || self.min_speed > self.max_speed {
            return Err(SettingsError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        let non_negative = [
            ("max_steer_force", self.max_steer_force),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("collision_avoidance_weight", self.collision_avoidance_weight),
            ("cohesion_radius", self.cohesion_radius),
            ("separation_radius", self.separation_radius),
            ("alignment_radius", self.alignment_radius),
            ("collision_avoidance_radius", self.collision_avoidance_radius),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SettingsError::Negative { field, value });
            }
        }

        Ok(())
    }

    // Largest radius any boid-to-boid query uses this tick
    pub fn max_neighbor_radius(&self) -> f32 {
        let cohesion = if self.use_center_for_cohesion { 0.0 } else { self.cohesion_radius };
        cohesion.max(self.separation_radius).max(self.alignment_radius)
    }

    /// Settings with every steering weight set to zero, handy for isolating
    /// one behavior at a time.
    pub fn without_steering(self) -> Self {
        Self {
            cohesion_weight: 0.0,
            separation_weight: 0.0,
            alignment_weight: 0.0,
            collision_avoidance_weight: 0.0,
            ..self
        }
    }
}
