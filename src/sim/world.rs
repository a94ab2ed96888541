//! The world aggregate: every live entity plus progression and phase state
//!
//! No module-level collections anywhere; the whole simulation is this one
//! struct, so multiple instances can coexist (tests run worlds side by side).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{
    Boss, Enemy, Helper, Obstacle, Orb, Particle, Player, Projectile, Weapon,
};
use super::steering::{Circle, Neighbor};
use crate::consts::BASE_XP_THRESHOLD;
use crate::settings::WorldConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    GameOver,
}

/// Helper coordination policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationMode {
    /// Each helper trails the previous one; the first trails the player
    Chain,
    /// Loose escort around the player
    Flock,
}

impl FormationMode {
    pub fn toggled(self) -> Self {
        match self {
            FormationMode::Chain => FormationMode::Flock,
            FormationMode::Flock => FormationMode::Chain,
        }
    }
}

/// Score, level, and experience state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    /// Monotonic; never decreases within a run
    pub score: u64,
    /// Starts at 1, increases only on boss defeat
    pub level: u32,
    /// Capped at `next_level_xp` while a boss is alive
    pub xp: u32,
    pub next_level_xp: u32,
}

impl Progression {
    fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            xp: 0,
            next_level_xp: BASE_XP_THRESHOLD,
        }
    }
}

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub config: WorldConfig,
    pub phase: GamePhase,
    /// Orthogonal to the phase: freezes simulation, not presentation
    pub paused: bool,
    pub formation: FormationMode,
    /// Frames simulated since the last reset
    pub frame: u64,
    pub progression: Progression,
    /// Best score seen; seeded from external storage at startup
    pub high_score: u64,

    pub player: Player,
    pub weapon: Weapon,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub player_bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub orbs: Vec<Orb>,
    pub helpers: Vec<Helper>,
    /// At most one boss alive at a time
    pub boss: Option<Boss>,
    /// Cosmetic only; not part of persistent state
    #[serde(skip)]
    pub particles: Vec<Particle>,

    /// Spawn/variant RNG; rebuilt from the config seed on reset so replays
    /// from a fixed seed are reproducible
    #[serde(skip, default = "skipped_rng")]
    pub rng: Pcg32,
}

impl World {
    /// Build a fresh world in the menu phase
    pub fn new(config: WorldConfig) -> Self {
        let center = Vec2::new(config.width / 2.0, config.height / 2.0);
        let mut world = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            phase: GamePhase::Menu,
            paused: false,
            formation: FormationMode::Chain,
            frame: 0,
            progression: Progression::new(),
            high_score: 0,
            player: Player::new(center),
            weapon: Weapon::default(),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            orbs: Vec::new(),
            helpers: Vec::new(),
            boss: None,
            particles: Vec::new(),
        };
        world.spawn_obstacles();
        world.helpers.push(Helper::new(center));
        world
    }

    /// Start (or restart) a run: progression zeroed, entities rebuilt, player
    /// centered and healed, one helper. The high score survives.
    pub fn reset_game(&mut self) {
        let center = self.arena_center();

        self.progression = Progression::new();
        self.frame = 0;
        self.paused = false;
        self.rng = Pcg32::seed_from_u64(self.config.seed);

        self.player = Player::new(center);
        self.weapon = Weapon::default();
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.particles.clear();
        self.orbs.clear();
        self.helpers.clear();
        self.boss = None;

        self.obstacles.clear();
        self.spawn_obstacles();
        self.helpers.push(Helper::new(center));

        self.phase = GamePhase::Playing;
        log::info!("new game started (seed {})", self.config.seed);
    }

    /// Return to the title screen after a game over
    pub fn to_menu(&mut self) {
        if self.phase == GamePhase::GameOver {
            self.phase = GamePhase::Menu;
        }
    }

    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.config.width / 2.0, self.config.height / 2.0)
    }

    /// Scatter drifting obstacles, keeping a clearance around the spawn point
    fn spawn_obstacles(&mut self) {
        let center = self.arena_center();
        for _ in 0..self.config.obstacle_count {
            let pos = Vec2::new(
                self.rng.random_range(0.0..self.config.width),
                self.rng.random_range(0.0..self.config.height),
            );
            if pos.distance(center) > self.config.obstacle_clearance {
                let radius = self
                    .rng
                    .random_range(self.config.obstacle_min_radius..self.config.obstacle_max_radius);
                self.obstacles.push(Obstacle::new(pos, radius, &mut self.rng));
            }
        }
    }

    /// Obstacle footprints, snapshotted for this frame's steering
    pub fn obstacle_circles(&self) -> Vec<Circle> {
        self.obstacles
            .iter()
            .map(|o| Circle {
                pos: o.body.pos,
                radius: o.body.radius,
            })
            .collect()
    }

    /// Enemy position/velocity snapshot for separation queries
    pub fn enemy_neighbors(&self) -> Vec<Neighbor> {
        self.enemies
            .iter()
            .map(|e| Neighbor {
                pos: e.body.pos,
                vel: e.body.vel,
            })
            .collect()
    }

    /// Helper position/velocity snapshot for separation queries
    pub fn helper_neighbors(&self) -> Vec<Neighbor> {
        self.helpers
            .iter()
            .map(|h| Neighbor {
                pos: h.body.pos,
                vel: h.body.vel,
            })
            .collect()
    }
}

/// Position of the live enemy closest to `origin`, if any
pub fn closest_enemy(enemies: &[Enemy], origin: Vec2) -> Option<&Enemy> {
    enemies.iter().min_by(|a, b| {
        let da = a.body.pos.distance_squared(origin);
        let db = b.body.pos.distance_squared(origin);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WorldConfig {
        WorldConfig::with_seed(42)
    }

    #[test]
    fn new_world_starts_in_menu_with_one_helper() {
        let world = World::new(test_config());
        assert_eq!(world.phase, GamePhase::Menu);
        assert_eq!(world.helpers.len(), 1);
        assert!(world.enemies.is_empty());
        assert!(world.boss.is_none());
        assert_eq!(world.player.body.pos, world.arena_center());
    }

    #[test]
    fn obstacles_keep_clear_of_spawn() {
        let world = World::new(test_config());
        let center = world.arena_center();
        assert!(!world.obstacles.is_empty());
        for obs in &world.obstacles {
            assert!(obs.body.pos.distance(center) > world.config.obstacle_clearance);
        }
    }

    #[test]
    fn reset_rebuilds_the_run_but_keeps_high_score() {
        let mut world = World::new(test_config());
        world.high_score = 1234;
        world.progression.score = 999;
        world.progression.level = 4;
        world.reset_game();

        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.progression.score, 0);
        assert_eq!(world.progression.level, 1);
        assert_eq!(world.progression.xp, 0);
        assert_eq!(world.progression.next_level_xp, BASE_XP_THRESHOLD);
        assert_eq!(world.high_score, 1234);
        assert_eq!(world.helpers.len(), 1);
        assert_eq!(world.player.health, world.player.max_health);
    }

    #[test]
    fn to_menu_only_leaves_game_over() {
        let mut world = World::new(test_config());
        world.reset_game();
        world.to_menu();
        assert_eq!(world.phase, GamePhase::Playing);

        world.phase = GamePhase::GameOver;
        world.to_menu();
        assert_eq!(world.phase, GamePhase::Menu);
    }

    #[test]
    fn closest_enemy_picks_the_nearest() {
        let mut world = World::new(test_config());
        world.reset_game();
        let mut a = Enemy::new(Vec2::new(300.0, 0.0), 1, &mut world.rng);
        a.body.pos = Vec2::new(300.0, 0.0);
        let mut b = Enemy::new(Vec2::new(100.0, 0.0), 1, &mut world.rng);
        b.body.pos = Vec2::new(100.0, 0.0);
        world.enemies = vec![a, b];

        let nearest = closest_enemy(&world.enemies, Vec2::ZERO).unwrap();
        assert_eq!(nearest.body.pos, Vec2::new(100.0, 0.0));
        assert!(closest_enemy(&[], Vec2::ZERO).is_none());
    }
}
