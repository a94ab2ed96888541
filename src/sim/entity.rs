//! Entity archetypes built on [`SteeringBody`]
//!
//! Every archetype owns its body (composition, no shared base state) and
//! exposes an `update` that computes its steering forces for the frame and
//! integrates them. Force weights are applied before accumulation, so the
//! capped-sum composition in `steering` sees already-scaled components.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::steering::{Circle, Neighbor, SteeringBody};
use crate::consts::*;

/// Anything with a circular footprint that can be hit-tested
pub trait Footprint {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

macro_rules! body_footprint {
    ($ty:ty) => {
        impl Footprint for $ty {
            fn pos(&self) -> Vec2 {
                self.body.pos
            }
            fn radius(&self) -> f32 {
                self.body.radius
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The player avatar
///
/// Unlike AI entities, the player's velocity is set directly from input every
/// frame rather than accumulated as a force, which keeps movement crisp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: SteeringBody,
    pub size: f32,
    pub max_health: i32,
    pub health: i32,
    /// Frames of damage immunity remaining
    pub invincible_frames: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: SteeringBody::new(pos),
            size: PLAYER_SIZE,
            max_health: PLAYER_MAX_HEALTH,
            health: PLAYER_MAX_HEALTH,
            invincible_frames: 0,
        }
    }

    /// Apply movement intent, resolve obstacle push-back, integrate
    pub fn update(&mut self, dir: Vec2, obstacles: &[Circle]) {
        self.body.vel = dir.normalize_or_zero() * self.body.max_speed;

        // If the next position would overlap an obstacle, add a push-back
        // impulse straight into velocity before moving.
        let future = self.body.pos + self.body.vel;
        for obs in obstacles {
            if future.distance(obs.pos) < self.size / 2.0 + obs.radius {
                let push = (self.body.pos - obs.pos).normalize_or_zero() * self.body.max_speed;
                self.body.vel += push;
            }
        }

        self.body.integrate();

        if self.invincible_frames > 0 {
            self.invincible_frames -= 1;
        }
    }

    /// Damage is ignored entirely (not reduced) while invincible
    pub fn take_damage(&mut self, amount: i32) {
        if self.invincible_frames > 0 {
            return;
        }
        self.health -= amount;
        self.invincible_frames = INVINCIBILITY_FRAMES;
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_frames > 0
    }

    /// Keep the sprite fully inside the arena
    pub fn constrain(&mut self, width: f32, height: f32) {
        let half = self.size / 2.0;
        self.body.pos.x = self.body.pos.x.clamp(half, width - half);
        self.body.pos.y = self.body.pos.y.clamp(half, height - half);
    }
}

impl Footprint for Player {
    fn pos(&self) -> Vec2 {
        self.body.pos
    }
    // The hittable body is half the sprite size
    fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    /// Keeps its distance and takes precision shots
    Sniper,
    /// Slow damage sponge, contact damage only
    Tank,
    /// Fast glass cannon that explodes on contact
    Kamikaze,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: SteeringBody,
    pub variant: EnemyVariant,
    pub health: i32,
    pub damage: i32,
    /// Frames until the next shot attempt (snipers only)
    pub fire_timer: u32,
    pub ideal_distance: f32,
    pub shooting_range: f32,
}

impl Enemy {
    /// Roll a variant and scale its stats by the current level
    pub fn new(pos: Vec2, level: u32, rng: &mut impl Rng) -> Self {
        let variant = match rng.random_range(0..3) {
            0 => EnemyVariant::Sniper,
            1 => EnemyVariant::Tank,
            _ => EnemyVariant::Kamikaze,
        };
        let lvl = level as f32;
        let mut body = SteeringBody::new(pos);
        let (health, damage);
        match variant {
            EnemyVariant::Sniper => {
                body.max_speed = 2.0 + lvl * 0.1;
                body.radius = 35.0;
                health = 20 + level as i32 * 5;
                damage = 10 + level as i32;
            }
            EnemyVariant::Tank => {
                body.max_speed = 1.0 + lvl * 0.05;
                body.radius = 50.0;
                health = 50 + level as i32 * 20;
                damage = 20 + level as i32;
            }
            EnemyVariant::Kamikaze => {
                body.max_speed = 4.0 + lvl * 0.3;
                body.radius = 25.0;
                health = 5 + level as i32 * 2;
                damage = 40 + level as i32 * 5;
            }
        }
        Self {
            body,
            variant,
            health,
            damage,
            fire_timer: rng.random_range(60..120),
            ideal_distance: 300.0,
            shooting_range: 500.0,
        }
    }

    pub fn is_kamikaze(&self) -> bool {
        self.variant == EnemyVariant::Kamikaze
    }

    /// Steer for one frame: variant-specific seek plus separation and
    /// obstacle avoidance, each pre-scaled before the shared weights
    pub fn update(&mut self, target: Vec2, peers: &[Neighbor], obstacles: &[Circle]) {
        let mut f_separate = self.body.separate(peers);
        let mut f_avoid = self.body.avoid(obstacles);

        let f_seek = match self.variant {
            EnemyVariant::Sniper => {
                // Hold the ideal range: back off when crowded, close otherwise
                if self.body.pos.distance(target) < self.ideal_distance {
                    self.body.flee(target)
                } else {
                    self.body.seek(target)
                }
            }
            EnemyVariant::Tank => {
                // Plows ahead; obstacles barely register
                f_avoid *= 0.5;
                self.body.seek(target)
            }
            EnemyVariant::Kamikaze => {
                // Swarm hard, separate barely
                f_separate *= 0.2;
                self.body.seek(target) * 2.0
            }
        };

        self.body.apply_force(f_seek);
        self.body.apply_force(f_separate * 1.5);
        self.body.apply_force(f_avoid * 3.0);
        self.body.integrate();
    }

    /// Sniper fire control; other variants never shoot
    ///
    /// The cooldown only re-randomizes on an actual shot, so an out-of-range
    /// sniper retries every frame until the target wanders into range.
    pub fn try_fire(&mut self, target: Vec2, rng: &mut impl Rng) -> Option<Projectile> {
        if self.variant != EnemyVariant::Sniper {
            return None;
        }
        self.fire_timer = self.fire_timer.saturating_sub(1);
        if self.fire_timer > 0 {
            return None;
        }
        if self.body.pos.distance(target) >= self.shooting_range {
            return None;
        }
        self.fire_timer = rng.random_range(100..200);
        Some(Projectile::new(
            self.body.pos,
            target - self.body.pos,
            ProjectileOwner::Enemy,
            SNIPER_SHOT_SPEED,
            10.0,
            self.damage,
        ))
    }
}

body_footprint!(Enemy);

// ---------------------------------------------------------------------------
// Boss
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: SteeringBody,
    pub max_health: i32,
    pub health: i32,
    pub damage: i32,
    pub attack_timer: u32,
}

impl Boss {
    pub fn new(pos: Vec2, level: u32) -> Self {
        let mut body = SteeringBody::new(pos);
        body.radius = 150.0;
        body.max_speed = 1.5;
        let max_health = 1000 * level as i32;
        Self {
            body,
            max_health,
            health: max_health,
            damage: 15 + level as i32 * 5,
            attack_timer: 0,
        }
    }

    /// Chase the player at half strength and shove obstacles out of the way
    pub fn update(&mut self, player_pos: Vec2, obstacles: &mut [Obstacle]) {
        let f_seek = self.body.seek(player_pos) * 0.5;
        self.body.apply_force(f_seek);

        for obs in obstacles.iter_mut() {
            let d = self.body.pos.distance(obs.body.pos);
            if d < self.body.radius + obs.body.radius + 30.0 {
                let push = (obs.body.pos - self.body.pos).normalize_or_zero() * 2.0;
                obs.body.apply_force(push);
            }
        }

        self.body.integrate();
        self.attack_timer += 1;
    }

    /// Full-circle radial burst once the attack timer laps
    pub fn try_fire(&mut self) -> Option<Vec<Projectile>> {
        if self.attack_timer < BOSS_ATTACK_INTERVAL {
            return None;
        }
        self.attack_timer = 0;
        // One shot every PI/8 around the full circle
        let count = 16;
        let step = TAU / count as f32;
        let mut volley = Vec::with_capacity(count);
        for i in 0..count {
            let dir = Vec2::from_angle(step * i as f32);
            volley.push(Projectile::new(
                self.body.pos,
                dir,
                ProjectileOwner::Boss,
                ENEMY_SHOT_SPEED,
                40.0,
                self.damage,
            ));
        }
        Some(volley)
    }
}

body_footprint!(Boss);

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

/// Allied drone that escorts the player and fires on its own cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Helper {
    pub body: SteeringBody,
    pub fire_timer: u32,
}

impl Helper {
    pub fn new(pos: Vec2) -> Self {
        let mut body = SteeringBody::new(pos);
        body.radius = 30.0;
        body.max_speed = 6.0;
        body.max_force = 0.15;
        Self {
            body,
            fire_timer: 10,
        }
    }

    /// Steer for one frame by priority: boss hunt, chain formation, or
    /// flocking loosely around the player. Obstacle avoidance always applies.
    pub fn update(
        &mut self,
        player_pos: Vec2,
        peers: &[Neighbor],
        boss_pos: Option<Vec2>,
        chain_target: Option<Vec2>,
        obstacles: &[Circle],
    ) {
        let f_avoid = self.body.avoid(obstacles) * 3.0;
        self.body.apply_force(f_avoid);

        if let Some(boss) = boss_pos {
            let f_seek = self.body.seek(boss) * 1.5;
            let f_sep = self.body.separate(peers) * 2.0;
            self.body.apply_force(f_seek);
            self.body.apply_force(f_sep);
        } else if let Some(target) = chain_target {
            // Strong seek keeps the chain taut; a hard flee inside 80 units
            // keeps the links spaced.
            let f_seek = self.body.seek(target) * 3.0;
            if self.body.pos.distance(target) < 80.0 {
                let f_flee = self.body.flee(target) * 5.0;
                self.body.apply_force(f_flee);
            }
            self.body.apply_force(f_seek);
            let f_sep = self.body.separate(peers) * 2.5;
            self.body.apply_force(f_sep);
        } else {
            // Flock mode: personal-space rule around the player. No cohesion,
            // which would clump the escort back together.
            let f_seek = if self.body.pos.distance(player_pos) < 100.0 {
                self.body.flee(player_pos) * 2.0
            } else {
                self.body.seek(player_pos)
            };
            let f_sep = self.body.separate(peers) * 3.0;
            self.body.apply_force(f_seek);
            self.body.apply_force(f_sep);
        }

        self.body.integrate();
        self.fire_timer = self.fire_timer.saturating_sub(1);
    }

    /// Fire at a target if the cooldown has lapsed
    pub fn try_fire(&mut self, target: Vec2) -> Option<Projectile> {
        if self.fire_timer > 0 {
            return None;
        }
        self.fire_timer = HELPER_FIRE_COOLDOWN;
        Some(Projectile::friendly(
            self.body.pos,
            target - self.body.pos,
            ProjectileOwner::Helper,
        ))
    }
}

body_footprint!(Helper);

// ---------------------------------------------------------------------------
// Obstacle
// ---------------------------------------------------------------------------

/// Drifting debris; wraps at the arena bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: SteeringBody,
}

impl Obstacle {
    pub fn new(pos: Vec2, radius: f32, rng: &mut impl Rng) -> Self {
        let mut body = SteeringBody::new(pos);
        body.radius = radius;
        body.max_speed = 2.0;
        let angle = rng.random_range(0.0..TAU);
        body.vel = Vec2::from_angle(angle) * rng.random_range(0.5..1.5);
        Self { body }
    }

    pub fn update(&mut self, width: f32, height: f32) {
        self.body.integrate();

        // Wrap around the map, not the viewport
        let r = self.body.radius;
        if self.body.pos.x < -r {
            self.body.pos.x = width + r;
        } else if self.body.pos.x > width + r {
            self.body.pos.x = -r;
        }
        if self.body.pos.y < -r {
            self.body.pos.y = height + r;
        } else if self.body.pos.y > height + r {
            self.body.pos.y = -r;
        }
    }
}

body_footprint!(Obstacle);

// ---------------------------------------------------------------------------
// Orb
// ---------------------------------------------------------------------------

/// Experience drop; inert until the player first comes close, then it chases
/// the player forever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub body: SteeringBody,
    pub value: u32,
    pub magnetized: bool,
}

impl Orb {
    pub fn new(pos: Vec2) -> Self {
        let mut body = SteeringBody::new(pos);
        body.radius = 15.0;
        body.max_speed = 8.0;
        Self {
            body,
            value: ORB_VALUE,
            magnetized: false,
        }
    }

    pub fn update(&mut self, player_pos: Vec2) {
        if self.body.pos.distance(player_pos) < ORB_MAGNET_RADIUS {
            self.magnetized = true;
        }
        if self.magnetized {
            let f_seek = self.body.seek(player_pos) * 2.0;
            self.body.apply_force(f_seek);
        }
        self.body.integrate();
    }
}

body_footprint!(Orb);

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

/// Cosmetic spark; no collision interactions with anything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: SteeringBody,
    pub color: [u8; 3],
    pub alpha: f32,
    pub size: f32,
    pub decay: f32,
}

impl Particle {
    pub fn new(pos: Vec2, color: [u8; 3], rng: &mut impl Rng) -> Self {
        let mut body = SteeringBody::new(pos);
        let angle = rng.random_range(0.0..TAU);
        body.vel = Vec2::from_angle(angle) * rng.random_range(1.0..5.0);
        Self {
            body,
            color,
            alpha: 255.0,
            size: rng.random_range(5.0..15.0),
            decay: rng.random_range(5.0..10.0),
        }
    }

    pub fn update(&mut self) {
        self.body.vel *= 0.9;
        self.body.integrate();
        self.alpha -= self.decay;
        self.size *= 0.95;
    }

    pub fn is_removable(&self) -> bool {
        self.alpha <= 0.0
    }
}

// ---------------------------------------------------------------------------
// Projectiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Enemy,
    Boss,
    Helper,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: SteeringBody,
    pub damage: i32,
    /// Frames to live
    pub lifetime: i32,
    pub owner: ProjectileOwner,
}

impl Projectile {
    pub fn new(
        pos: Vec2,
        dir: Vec2,
        owner: ProjectileOwner,
        speed: f32,
        radius: f32,
        damage: i32,
    ) -> Self {
        let mut body = SteeringBody::new(pos);
        body.vel = dir.normalize_or_zero() * speed;
        body.max_speed = 20.0;
        body.radius = radius;
        Self {
            body,
            damage,
            lifetime: SHOT_LIFETIME,
            owner,
        }
    }

    /// Standard player/helper shot
    pub fn friendly(pos: Vec2, dir: Vec2, owner: ProjectileOwner) -> Self {
        Self::new(pos, dir, owner, FRIENDLY_SHOT_SPEED, 25.0, 25)
    }

    /// Integrate and age; expired once the lifetime runs out
    pub fn update(&mut self) {
        self.body.integrate();
        self.lifetime -= 1;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime < 0
    }
}

body_footprint!(Projectile);

// ---------------------------------------------------------------------------
// Weapon
// ---------------------------------------------------------------------------

/// The player's auto-firing weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub cooldown: u32,
    /// Frames between shots; drops as bosses fall
    pub fire_rate: u32,
    pub range: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            cooldown: 0,
            fire_rate: WEAPON_FIRE_RATE,
            range: WEAPON_RANGE,
        }
    }
}

impl Weapon {
    /// Tick the cooldown and fire at the target if it is in range
    pub fn update(&mut self, origin: Vec2, target: Option<Vec2>) -> Option<Projectile> {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown > 0 {
            return None;
        }
        let target = target?;
        if origin.distance(target) >= self.range {
            return None;
        }
        self.cooldown = self.fire_rate;
        Some(Projectile::friendly(
            origin,
            target - origin,
            ProjectileOwner::Player,
        ))
    }

    /// Boss rewards speed the weapon up, down to a floor
    pub fn improve(&mut self) {
        self.fire_rate = self.fire_rate.saturating_sub(2).max(WEAPON_MIN_FIRE_RATE);
    }
}
