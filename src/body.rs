/*
 * Kinematic Body Module
 *
 * The steering core never owns a boid's position. It reads the position and
 * reads/writes velocity and heading through the KinematicBody trait, so the
 * same flock can drive an in-memory body (Boid, below) or a host engine's
 * rigid bodies.
 */

use glam::Vec3;

use crate::math::FORWARD;

pub trait KinematicBody {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn heading(&self) -> Vec3;
    fn set_heading(&mut self, heading: Vec3);
}

/// A plain body that owns its own kinematic state. Positions only move when
/// the driver calls [`Boid::advance`], standing in for a physics engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    pub heading: Vec3,
}

impl Boid {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            heading: FORWARD,
        }
    }

    // Move the boid along its velocity
    pub fn advance(&mut self, delta_time: f32) {
        self.position += self.velocity * delta_time;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

impl KinematicBody for Boid {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn heading(&self) -> Vec3 {
        self.heading
    }

    fn set_heading(&mut self, heading: Vec3) {
        self.heading = heading;
    }
}

/// Read-only copy of one body taken at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub heading: Vec3,
}

impl BodyState {
    pub fn capture<B: KinematicBody>(body: &B) -> Self {
        Self {
            position: body.position(),
            velocity: body.velocity(),
            heading: body.heading(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_along_velocity() {
        let mut boid = Boid::new(Vec3::new(1.0, 0.0, 0.0));
        boid.set_velocity(Vec3::new(0.0, 2.0, 0.0));
        boid.advance(0.5);
        assert_eq!(boid.position, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn capture_copies_the_kinematic_state() {
        let mut boid = Boid::new(Vec3::ONE);
        boid.set_velocity(Vec3::X);
        boid.set_heading(Vec3::X);
        let state = BodyState::capture(&boid);
        assert_eq!(state.position, Vec3::ONE);
        assert_eq!(state.velocity, Vec3::X);
        assert_eq!(state.heading, Vec3::X);
    }
}
