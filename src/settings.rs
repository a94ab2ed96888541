//! World-initialization parameters
//!
//! Supplied by the embedding layer when a world is built; the simulation
//! never reads configuration from disk itself. Serializable so launchers can
//! keep presets around.

use serde::{Deserialize, Serialize};

use crate::consts::{MAP_HEIGHT, MAP_WIDTH};

/// Everything needed to build a [`crate::sim::World`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Arena dimensions (map space, not the viewport)
    pub width: f32,
    pub height: f32,
    /// Seed for spawn placement, variant rolls, and particle scatter
    pub seed: u64,
    /// Obstacle placement attempts; attempts landing too close to the spawn
    /// point are discarded, so the final count may be lower
    pub obstacle_count: usize,
    pub obstacle_min_radius: f32,
    pub obstacle_max_radius: f32,
    /// Minimum distance between an obstacle and the player spawn point
    pub obstacle_clearance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            seed: 0,
            obstacle_count: 30,
            obstacle_min_radius: 40.0,
            obstacle_max_radius: 80.0,
            obstacle_clearance: 300.0,
        }
    }
}

impl WorldConfig {
    /// Default arena with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_standard_arena() {
        let config = WorldConfig::default();
        assert_eq!(config.width, 2000.0);
        assert_eq!(config.height, 2000.0);
        assert_eq!(config.obstacle_count, 30);
        assert!(config.obstacle_min_radius < config.obstacle_max_radius);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = WorldConfig::with_seed(77);
        let json = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 77);
        assert_eq!(back.width, config.width);
    }
}
