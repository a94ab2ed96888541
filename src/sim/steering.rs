//! Steering-behavior primitives shared by every moving entity
//!
//! Classic Reynolds steering: each behavior returns a force capped at
//! `max_force`; callers scale and accumulate forces with `apply_force`, then a
//! single `integrate()` applies the sum. Combined steering is therefore a
//! capped sum of individually-capped components, not a jointly-capped
//! resultant. The tuned behavior weights throughout the sim depend on that
//! composition order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Distance under which `arrive` starts ramping speed down
const ARRIVE_RADIUS: f32 = 100.0;
/// Extra perception range for obstacle avoidance, added to the body radius
const AVOID_PERCEPTION: f32 = 50.0;
/// Neighborhood radius for align/cohesion
const FLOCK_NEIGHBOR_DIST: f32 = 50.0;

/// Position/velocity snapshot of a nearby entity
///
/// Behaviors take these instead of live entity references so every update in
/// a frame reads a consistent picture of the world.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A circular footprint, used for obstacle queries and hit testing
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
}

/// Physics state embedded in every moving entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub radius: f32,
}

impl SteeringBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            max_speed: 5.0,
            max_force: 0.1,
            radius: 16.0,
        }
    }

    /// Accumulate a force for this frame
    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// Advance one frame: `vel += acc`, clamp to `max_speed`, `pos += vel`,
    /// reset `acc`
    pub fn integrate(&mut self) {
        self.vel += self.acc;
        self.vel = self.vel.clamp_length_max(self.max_speed);
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
    }

    /// Steer toward a target at full speed
    pub fn seek(&self, target: Vec2) -> Vec2 {
        let desired = (target - self.pos).normalize_or_zero() * self.max_speed;
        (desired - self.vel).clamp_length_max(self.max_force)
    }

    /// Steer away from a target
    pub fn flee(&self, target: Vec2) -> Vec2 {
        let desired = (self.pos - target).normalize_or_zero() * self.max_speed;
        (desired - self.vel).clamp_length_max(self.max_force)
    }

    /// Seek with deceleration inside a 100-unit radius, preventing overshoot
    pub fn arrive(&self, target: Vec2) -> Vec2 {
        let offset = target - self.pos;
        let d = offset.length();
        let speed = if d < ARRIVE_RADIUS {
            self.max_speed * d / ARRIVE_RADIUS
        } else {
            self.max_speed
        };
        let desired = offset.normalize_or_zero() * speed;
        (desired - self.vel).clamp_length_max(self.max_force)
    }

    /// Steer away from obstacles within perception range
    ///
    /// Each contributing obstacle pushes with weight 1/distance; contributions
    /// are averaged, scaled to `max_speed`, and converted to a capped steering
    /// force. Zero when nothing is in range.
    pub fn avoid(&self, obstacles: &[Circle]) -> Vec2 {
        let perception = self.radius + AVOID_PERCEPTION;
        let mut sum = Vec2::ZERO;
        let mut count = 0;
        for obs in obstacles {
            let d = self.pos.distance(obs.pos);
            if d > 0.0 && d < obs.radius + perception {
                sum += (self.pos - obs.pos).normalize_or_zero() / d;
                count += 1;
            }
        }
        if count == 0 {
            return Vec2::ZERO;
        }
        let desired = (sum / count as f32).normalize_or_zero() * self.max_speed;
        (desired - self.vel).clamp_length_max(self.max_force)
    }

    /// Push away from neighbors crowding inside 2.5x the body radius
    ///
    /// Same 1/distance weighting as `avoid`, but the average is re-normalized
    /// before scaling: the combined direction matters more than its magnitude.
    pub fn separate(&self, neighbors: &[Neighbor]) -> Vec2 {
        let desired_separation = self.radius * 2.5;
        let mut sum = Vec2::ZERO;
        let mut count = 0;
        for other in neighbors {
            let d = self.pos.distance(other.pos);
            if d > 0.0 && d < desired_separation {
                sum += (self.pos - other.pos).normalize_or_zero() / d;
                count += 1;
            }
        }
        if count == 0 {
            return Vec2::ZERO;
        }
        let desired = (sum / count as f32).normalize_or_zero() * self.max_speed;
        (desired - self.vel).clamp_length_max(self.max_force)
    }

    /// Match the average heading of neighbors within the flock radius
    pub fn align(&self, neighbors: &[Neighbor]) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;
        for other in neighbors {
            let d = self.pos.distance(other.pos);
            if d > 0.0 && d < FLOCK_NEIGHBOR_DIST {
                sum += other.vel;
                count += 1;
            }
        }
        if count == 0 {
            return Vec2::ZERO;
        }
        let desired = (sum / count as f32).normalize_or_zero() * self.max_speed;
        (desired - self.vel).clamp_length_max(self.max_force)
    }

    /// Steer toward the center of mass of neighbors within the flock radius
    pub fn cohesion(&self, neighbors: &[Neighbor]) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;
        for other in neighbors {
            let d = self.pos.distance(other.pos);
            if d > 0.0 && d < FLOCK_NEIGHBOR_DIST {
                sum += other.pos;
                count += 1;
            }
        }
        if count == 0 {
            return Vec2::ZERO;
        }
        self.seek(sum / count as f32)
    }
}
