/*
 * Simulation Driver Module
 *
 * Stands in for a host game loop. Frame times are fed into an accumulator and
 * drained in fixed-size steps; each step ticks the flock's steering and then
 * moves every body along its new velocity. A cap on steps per frame keeps a
 * long stall from turning into a spiral of catch-up work.
 */

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::body::Boid;
use crate::debug::{DebugInfo, TickStats};
use crate::error::{SettingsError, SettingsResult};
use crate::flock::Flock;
use crate::obstacle::{NoObstacles, ObstacleProbe};
use crate::params::FlockSettings;
use crate::{DEFAULT_TICK_RATE, MAX_STEPS_PER_FRAME};

pub struct Simulation<P = NoObstacles> {
    pub flock: Flock<Boid>,
    pub probe: P,
    pub paused: bool,
    pub max_steps_per_frame: usize,
    pub debug_info: DebugInfo,
    // Fixed timestep physics variables
    physics_accumulator: Duration,
    physics_step_size: Duration,
}

impl Simulation<NoObstacles> {
    pub fn new(settings: FlockSettings) -> SettingsResult<Self> {
        Self::with_probe(settings, NoObstacles)
    }
}

impl<P: ObstacleProbe> Simulation<P> {
    pub fn with_probe(settings: FlockSettings, probe: P) -> SettingsResult<Self> {
        Ok(Self {
            flock: Flock::new(settings)?,
            probe,
            paused: false,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
            debug_info: DebugInfo::default(),
            physics_accumulator: Duration::ZERO,
            physics_step_size: Duration::from_secs_f64(1.0 / DEFAULT_TICK_RATE),
        })
    }

    /// Run physics at `ticks_per_second` fixed steps.
    pub fn set_tick_rate(&mut self, ticks_per_second: f32) -> SettingsResult<()> {
        let step = 1.0 / f64::from(ticks_per_second);
        // Rejects negative, non-finite and overflowing steps, and steps that
        // round down to zero nanoseconds
        match Duration::try_from_secs_f64(step) {
            Ok(step_size) if !step_size.is_zero() => {
                self.physics_step_size = step_size;
                Ok(())
            }
            _ => Err(SettingsError::InvalidStep(step as f32)),
        }
    }

    pub fn step_size(&self) -> Duration {
        self.physics_step_size
    }

    /// Spawn the configured initial number of boids, replacing any others.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.flock.settings().initial_boid_count;
        self.flock.initialize(count, rng);
        self.physics_accumulator = Duration::ZERO;
        debug!(boids = count, "simulation reset");
    }

    /// One tick of `delta_time` seconds: steer, then move.
    pub fn step(&mut self, delta_time: f32) -> TickStats {
        let stats = self.flock.update(delta_time, &self.probe);
        self.flock.advance(delta_time);

        self.debug_info.ticks += 1;
        self.debug_info.last_tick = stats;
        stats
    }

    /// Feed one frame's elapsed time and run as many fixed steps as it covers.
    /// Returns the number of steps taken.
    pub fn advance_frame(&mut self, frame_time: Duration) -> usize {
        if self.paused {
            self.debug_info.physics_updates_per_frame = 0;
            return 0;
        }

        self.physics_accumulator += frame_time;
        let step = self.physics_step_size.as_secs_f32();

        let mut physics_updates_this_frame = 0;
        while self.physics_accumulator >= self.physics_step_size {
            if physics_updates_this_frame == self.max_steps_per_frame {
                let dropped = self
                    .physics_accumulator
                    .as_nanos()
                    .checked_div(self.physics_step_size.as_nanos())
                    .unwrap_or(0) as u64;
                warn!(dropped, "physics fell behind; dropping steps");
                self.debug_info.dropped_steps += dropped;
                self.physics_accumulator = Duration::ZERO;
                break;
            }

            self.step(step);
            self.physics_accumulator -= self.physics_step_size;
            physics_updates_this_frame += 1;
        }

        self.debug_info.physics_updates_per_frame = physics_updates_this_frame;
        physics_updates_this_frame
    }
}
