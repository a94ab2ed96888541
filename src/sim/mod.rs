//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame step only; every "timer" is an integer frame counter
//! - Seeded RNG only, owned by the `World`
//! - No rendering or platform dependencies

pub mod combat;
pub mod director;
pub mod entity;
pub mod steering;
pub mod tick;
pub mod world;

pub use entity::{
    Boss, Enemy, EnemyVariant, Footprint, Helper, Obstacle, Orb, Particle, Player, Projectile,
    ProjectileOwner, Weapon,
};
pub use steering::{Circle, Neighbor, SteeringBody};
pub use tick::{FrameEvent, TickInput, tick};
pub use world::{FormationMode, GamePhase, Progression, World};
