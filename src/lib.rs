//! Space Survivor - a top-down survival arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, combat, spawn director, game state)
//! - `highscores`: Best-score tracking with a pluggable storage seam
//! - `settings`: World-initialization parameters
//!
//! Rendering, audio, and input decoding live in the embedding layer; the
//! simulation only consumes a [`sim::TickInput`] per frame and reports
//! [`sim::FrameEvent`]s back.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use settings::WorldConfig;
pub use sim::{FrameEvent, TickInput, World, tick};

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (map space, not the viewport)
    pub const MAP_WIDTH: f32 = 2000.0;
    pub const MAP_HEIGHT: f32 = 2000.0;

    /// Player sprite size; orbs are collected within this distance
    pub const PLAYER_SIZE: f32 = 80.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Frames of invincibility after a hit lands
    pub const INVINCIBILITY_FRAMES: u32 = 60;

    /// Weapon defaults (frames between shots, auto-target range)
    pub const WEAPON_FIRE_RATE: u32 = 20;
    pub const WEAPON_MIN_FIRE_RATE: u32 = 5;
    pub const WEAPON_RANGE: f32 = 300.0;

    /// Projectile speeds, units per frame
    pub const FRIENDLY_SHOT_SPEED: f32 = 10.0;
    pub const ENEMY_SHOT_SPEED: f32 = 6.0;
    pub const SNIPER_SHOT_SPEED: f32 = 12.0;
    /// Frames a projectile lives
    pub const SHOT_LIFETIME: i32 = 60;

    /// Progression
    pub const BASE_XP_THRESHOLD: u32 = 100;
    pub const ORB_VALUE: u32 = 10;
    /// Orbs latch onto the player inside this range
    pub const ORB_MAGNET_RADIUS: f32 = 100.0;

    /// Helper fire cadence and engagement rule
    pub const HELPER_FIRE_COOLDOWN: u32 = 40;
    /// Helpers only engage enemies this close to the player
    pub const HELPER_ENGAGE_RADIUS: f32 = 600.0;

    /// Boss radial burst cadence (frames)
    pub const BOSS_ATTACK_INTERVAL: u32 = 100;
}
