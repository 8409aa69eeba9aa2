/*
 * Debug Information Module
 *
 * This module defines the per-tick statistics returned by Flock::update and
 * the running DebugInfo kept by the simulation driver.
 *
 * Includes metrics for:
 * - Number of boids stepped
 * - Neighbor candidates distance-tested
 * - Obstacle probe hits
 * - Compute phase time and parallel chunk size
 */

use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    pub boids: usize,
    pub neighbor_checks: usize,
    pub obstacle_hits: usize,
    pub compute_time: Duration,
    // None when the compute phase ran sequentially
    pub chunk_size: Option<usize>,
}

impl TickStats {
    pub fn mean_neighbor_checks(&self) -> f32 {
        if self.boids == 0 {
            0.0
        } else {
            self.neighbor_checks as f32 / self.boids as f32
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub ticks: u64,
    pub physics_updates_per_frame: usize,
    pub dropped_steps: u64,
    pub last_tick: TickStats,
}
